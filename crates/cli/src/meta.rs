use anyhow::Result;
use clap::{Parser, Subcommand};
use sheetmeta::{MetaStore, SqliteStore, SyncSettings};

#[derive(Parser, Debug)]
pub struct MetaArgs {
    #[command(subcommand)]
    command: MetaCommands,
}

#[derive(Subcommand, Debug)]
enum MetaCommands {
    /// List every metadata key on the front page
    Show,
}

pub async fn handle_meta(args: &MetaArgs, store: &SqliteStore) -> Result<()> {
    match &args.command {
        MetaCommands::Show => {
            let settings = SyncSettings::load_stored(store).await?;
            let Some(record_id) = settings.front_page_id() else {
                println!("No front page set.");
                return Ok(());
            };
            let meta = store.list_meta(record_id).await?;
            if meta.is_empty() {
                println!("Record {record_id} has no metadata.");
            }
            for (key, value) in meta {
                println!("{key} = {value}");
            }
        }
    }
    Ok(())
}
