//! # Value Sanitization
//!
//! Every cell value is classified by shape and then cleaned for storage:
//! well-formed URLs go through [`sanitize_url`], everything else through
//! [`sanitize_text`]. Neither path can fail; the worst case is an empty string.
//!
//! Cleaning text can leave a string that now classifies as a URL, so
//! [`sanitize_value`] repeats classify-then-clean until the value is stable.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Schemes a sanitized URL may keep. Anything else is reduced to `""`.
const ALLOWED_PROTOCOLS: &[&str] = &[
    "http", "https", "ftp", "ftps", "mailto", "news", "irc", "irc6", "ircs", "gopher", "nntp",
    "feed", "telnet", "mms", "rtsp", "sms", "svn", "tel", "fax", "xmpp", "webcal", "urn",
];

/// Opaque schemes (no `//authority`) accepted as URLs without a host.
const HOSTLESS_SCHEMES: &[&str] = &["mailto", "news", "urn"];

/// Characters the trimming steps remove; narrower than `char::is_whitespace`.
const TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

static DISALLOWED_URL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\-~+_.?#=!&;,/:%@$|*'()\[\]]").unwrap());
static ENCODED_LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)%0[ad]").unwrap());
static SCRIPT_OR_STYLE: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?is)<script[^>]*?>.*?</script>").unwrap(),
        Regex::new(r"(?is)<style[^>]*?>.*?</style>").unwrap(),
    ]
});
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n\t ]+").unwrap());
static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").unwrap());
static PERCENT_OCTET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)%[a-f0-9]{2}").unwrap());

/// How a raw value will be sanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Url,
    Text,
}

/// Decides which sanitizer a value goes through.
pub fn classify(value: &str) -> ValueKind {
    if is_well_formed_url(value) {
        ValueKind::Url
    } else {
        ValueKind::Text
    }
}

/// Sanitizes one cell value. A missing cell sanitizes to `""`.
///
/// The result is stable: sanitizing it again returns it unchanged.
pub fn sanitize_value(raw: Option<&str>) -> String {
    let Some(value) = raw else {
        return String::new();
    };
    to_fixed_point(value.to_string(), sanitize_once)
}

fn sanitize_once(value: &str) -> String {
    match classify(value) {
        ValueKind::Url => sanitize_url(value),
        ValueKind::Text => sanitize_text(value),
    }
}

/// Returns true for absolute, ASCII-only URLs with a scheme and no whitespace.
///
/// The URL must carry a non-empty host, except for `file` URLs and the opaque
/// `mailto:`, `news:` and `urn:` forms. `Note:important` is text, not a URL.
pub fn is_well_formed_url(value: &str) -> bool {
    if value.is_empty()
        || !value.is_ascii()
        || value.chars().any(|c| c.is_ascii_whitespace() || c.is_ascii_control())
    {
        return false;
    }
    let Ok(url) = Url::parse(value) else {
        return false;
    };
    if url.cannot_be_a_base() {
        return HOSTLESS_SCHEMES.contains(&url.scheme());
    }
    url.scheme() == "file" || url.host_str().is_some_and(|host| !host.is_empty())
}

/// Cleans a URL for storage as a link.
pub fn sanitize_url(value: &str) -> String {
    to_fixed_point(value.to_string(), url_pass)
}

/// Cleans free text for storage as a plain field.
pub fn sanitize_text(value: &str) -> String {
    to_fixed_point(value.to_string(), text_pass)
}

fn to_fixed_point(mut current: String, pass: fn(&str) -> String) -> String {
    loop {
        let next = pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn url_pass(value: &str) -> String {
    let url = value.trim_start_matches(TRIM_CHARS).replace(' ', "%20");
    let mut url = DISALLOWED_URL_CHARS.replace_all(&url, "").into_owned();
    if url.is_empty() {
        return url;
    }

    if !url.to_ascii_lowercase().starts_with("mailto:") {
        while ENCODED_LINE_BREAK.is_match(&url) {
            url = ENCODED_LINE_BREAK.replace_all(&url, "").into_owned();
        }
    }
    let mut url = url.replace(";//", "://");

    if !url.contains(':') && !url.starts_with(['/', '#', '?']) {
        url = format!("http://{url}");
    }
    if url.starts_with('/') {
        return url;
    }

    let scheme = url
        .split(':')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if ALLOWED_PROTOCOLS.contains(&scheme.as_str()) {
        url
    } else {
        String::new()
    }
}

fn text_pass(value: &str) -> String {
    let mut text: String = value
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\r' | '\n' | '\t'))
        .collect();

    if text.contains('<') {
        text = escape_unclosed_angle_brackets(&text);
        text = strip_all_tags(&text);
    }

    let text = WHITESPACE_RUN.replace_all(&text, " ");
    let mut text = text.trim_matches(TRIM_CHARS).to_string();

    let mut found_octets = false;
    while PERCENT_OCTET.is_match(&text) {
        text = PERCENT_OCTET.replace_all(&text, "").into_owned();
        found_octets = true;
    }
    if found_octets {
        let collapsed = SPACE_RUN.replace_all(&text, " ");
        return collapsed.trim_matches(TRIM_CHARS).to_string();
    }
    text
}

/// Escapes each `<` that is not closed by a `>` before the next `<`.
fn escape_unclosed_angle_brackets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find(['<', '>']) {
            Some(end) if after.as_bytes()[end] == b'>' => {
                out.push_str(&rest[start..start + 1 + end + 1]);
                rest = &after[end + 1..];
            }
            Some(end) => {
                out.push_str("&lt;");
                out.push_str(&after[..end]);
                rest = &after[end..];
            }
            None => {
                out.push_str("&lt;");
                out.push_str(after);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn strip_all_tags(text: &str) -> String {
    let mut text = text.to_string();
    for element in SCRIPT_OR_STYLE.iter() {
        text = element.replace_all(&text, "").into_owned();
    }
    ANY_TAG.replace_all(&text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_shape() {
        assert_eq!(classify("https://example.com/x"), ValueKind::Url);
        assert_eq!(classify("mailto:team@example.com"), ValueKind::Url);
        assert_eq!(classify("Home"), ValueKind::Text);
        assert_eq!(classify("example.com"), ValueKind::Text);
        assert_eq!(classify(" https://example.com"), ValueKind::Text);
        assert_eq!(classify("https://exa mple.com"), ValueKind::Text);
        assert_eq!(classify("https://exämple.com"), ValueKind::Text);
        assert_eq!(classify(""), ValueKind::Text);
    }

    #[test]
    fn test_scheme_like_text_is_not_a_url() {
        let samples = [
            "Note:important",
            "ratio:3",
            "Price:$5",
            "localhost:8080",
            "<b>Note</b>:x",
        ];
        for text in samples {
            assert_eq!(classify(text), ValueKind::Text, "{text:?} classified as URL");
        }
        assert_eq!(classify("news:comp.lang.rust"), ValueKind::Url);
        assert_eq!(classify("urn:isbn:0451450523"), ValueKind::Url);
        assert_eq!(classify("file:///tmp/report.pdf"), ValueKind::Url);
        assert_eq!(classify("http://"), ValueKind::Text);
    }

    #[test]
    fn test_scheme_like_text_is_kept() {
        assert_eq!(sanitize_value(Some("Note:important")), "Note:important");
        assert_eq!(sanitize_value(Some("ratio:3")), "ratio:3");
        assert_eq!(sanitize_value(Some("localhost:8080")), "localhost:8080");
        assert_eq!(sanitize_value(Some("<b>Note</b>:x")), "Note:x");
    }

    #[test]
    fn test_missing_value_is_empty() {
        assert_eq!(sanitize_value(None), "");
        assert_eq!(sanitize_value(Some("")), "");
    }

    #[test]
    fn test_url_path_keeps_percent_escapes() {
        // The text path would strip `%41`; the URL path must not.
        let url = "https://example.com/a%41b?q=1&r=2#top";
        assert_eq!(sanitize_value(Some(url)), url);
    }

    #[test]
    fn test_url_strips_disallowed_characters() {
        assert_eq!(
            sanitize_url("https://example.com/<b>\"x\"{y}"),
            "https://example.com/bxy"
        );
    }

    #[test]
    fn test_url_strips_encoded_line_breaks() {
        assert_eq!(
            sanitize_url("https://example.com/a%0D%0Ab%0%0dd"),
            "https://example.com/ab"
        );
        // mailto links keep them.
        assert_eq!(
            sanitize_url("mailto:a@example.com?body=x%0Ay"),
            "mailto:a@example.com?body=x%0Ay"
        );
    }

    #[test]
    fn test_url_with_disallowed_protocol_is_emptied() {
        assert_eq!(sanitize_value(Some("gopherx://example.com/x")), "");
        assert_eq!(sanitize_value(Some("ws://example.com/socket")), "");
        assert_eq!(sanitize_url("javascript:alert(1)"), "");
    }

    #[test]
    fn test_hostless_script_scheme_is_plain_text() {
        assert_eq!(
            sanitize_value(Some("javascript:alert(1)")),
            "javascript:alert(1)"
        );
        assert_eq!(
            sanitize_value(Some("data:text/html,hi")),
            "data:text/html,hi"
        );
    }

    #[test]
    fn test_url_keeps_encoded_nul_and_rewrites_every_scheme_separator() {
        assert_eq!(
            sanitize_url("https://example.com/a%00b"),
            "https://example.com/a%00b"
        );
        assert_eq!(
            sanitize_url("http;//example.com/x;//y"),
            "http://example.com/x://y"
        );
    }

    #[test]
    fn test_text_that_cleans_into_a_url_is_sanitized_as_one() {
        assert_eq!(
            sanitize_value(Some("<b></b>https://example.com/{x}")),
            "https://example.com/x"
        );
        assert_eq!(
            sanitize_value(Some("%41https://example.com/\"x\"")),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_text_strips_markup_and_whitespace() {
        assert_eq!(
            sanitize_text("  <b>Bold</b>\n\tand   <i>italic</i>  "),
            "Bold and italic"
        );
        assert_eq!(
            sanitize_text("before<script>alert('x')</script>after"),
            "beforeafter"
        );
        assert_eq!(sanitize_text("<style>p{}</style>Styled"), "Styled");
    }

    #[test]
    fn test_text_escapes_lone_less_than() {
        assert_eq!(sanitize_text("1 < 2"), "1 &lt; 2");
        assert_eq!(sanitize_text("a <b c"), "a &lt;b c");
    }

    #[test]
    fn test_text_removes_percent_octets_and_controls() {
        assert_eq!(sanitize_text("50%25 off %%4141"), "50 off");
        assert_eq!(sanitize_text("a\u{0}b\u{7}c"), "abc");
    }

    #[test]
    fn test_sanitization_is_idempotent() {
        let samples = [
            "Home",
            "  spaced   out  ",
            "<p>Hello <b>world</b></p>",
            "1 < 2 and 3 > 2",
            "price: 10%20 now",
            "https://example.com/x",
            "https://example.com/path?q=a b",
            "HTTP://EXAMPLE.COM/%0d%0a",
            "ftp://files.example.com/pub",
            "unicodé text, naïve café",
            "Note:important",
            "<b>Note</b>:x",
            "javascript:alert(1)",
            "<i>https://example.com/</i>{x}",
            "<b></b>https://example.com/{x}",
            "%41https://example.com/\"x\"",
            "<p>mailto:a@example.com</p>",
            "%41gopherx://example.com/",
        ];
        for raw in samples {
            let once = sanitize_value(Some(raw));
            let twice = sanitize_value(Some(&once));
            assert_eq!(once, twice, "sanitizing {raw:?} was not idempotent");
        }
    }
}
