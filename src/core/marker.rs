use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // %% ... "theme": "base" ... %% — Obsidian comment blocks carrying mermaid
    // theme configuration. Quote style varies between notes.
    static ref THEME_BLOCK_RE: Regex =
        Regex::new(r#"(?s)%%.*?['"]theme['"]\s*:\s*['"]base['"].*?%%"#).unwrap();
}

/// Remove every `%% .. %%` block declaring the base mermaid theme, replacing
/// each with `replacement`. Returns the rewritten content and the number of
/// blocks removed; a second pass over the output removes nothing.
pub fn strip_theme_blocks(content: &str, replacement: &str) -> (String, usize) {
    let count = THEME_BLOCK_RE.find_iter(content).count();
    if count == 0 {
        return (content.to_string(), 0);
    }
    let stripped = THEME_BLOCK_RE.replace_all(content, replacement);
    (stripped.into_owned(), count)
}
