use anyhow::Result;
use clap::{Parser, Subcommand};
use sheetmeta::{save_settings, set_front_page, SqliteStore, SyncSettings};

#[derive(Parser, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsCommands,
}

#[derive(Subcommand, Debug)]
enum SettingsCommands {
    /// Print the stored settings
    Show,
    /// Store the spreadsheet ID and range
    Set(SetArgs),
}

#[derive(Parser, Debug)]
struct SetArgs {
    /// The ID of the Google Sheet (the part after /spreadsheets/d/ in its URL)
    #[arg(long)]
    spreadsheet_id: String,
    /// The A1-notation range holding the keys row and the values row
    #[arg(long = "range")]
    range: String,
    /// The record to use as the front page
    #[arg(long)]
    front_page: Option<i64>,
}

pub async fn handle_settings(args: &SettingsArgs, store: &SqliteStore) -> Result<()> {
    match &args.command {
        SettingsCommands::Show => {
            let settings = SyncSettings::load_stored(store).await?;
            print_settings(&settings);
        }
        SettingsCommands::Set(set_args) => {
            if let Some(record_id) = set_args.front_page {
                set_front_page(store, record_id).await?;
            }
            let settings = save_settings(store, &set_args.spreadsheet_id, &set_args.range).await?;
            println!("Settings saved!");
            print_settings(&settings);
        }
    }
    Ok(())
}

fn print_settings(settings: &SyncSettings) {
    println!("Spreadsheet ID: {}", settings.spreadsheet_id);
    println!("Sheet Range: {}", settings.range);
    match settings.front_page_id() {
        Some(id) => println!("Front page: {id}"),
        None => println!("Front page: (not set)"),
    }
}
