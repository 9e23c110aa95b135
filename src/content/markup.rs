use std::sync::OnceLock;

use regex::Regex;

static TAG: OnceLock<Regex> = OnceLock::new();

fn tag_pattern() -> &'static Regex {
    TAG.get_or_init(|| {
        Regex::new(r"</?[A-Za-z][A-Za-z0-9-]*(\s[^<>]*)?/?>").expect("tag pattern is valid")
    })
}

pub fn contains_markup(content: &str) -> bool {
    tag_pattern().is_match(content)
}

/// Terminal rendering of raw article markup. HTML goes through html2text;
/// anything else is shown as written so line breaks survive.
pub fn render(content: &str, width: usize) -> String {
    if !contains_markup(content) {
        return content.to_string();
    }

    match html2text::from_read(content.as_bytes(), width.max(1)) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("Falling back to raw markup: {}", e);
            content.to_string()
        }
    }
}
