use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    // ![[attachment name.png]]
    static ref EMBED_RE: Regex = Regex::new(r"!\[\[(.*?)\]\]").unwrap();
}

/// Extract the set of attachment file names embedded in a note.
///
/// Returns a set: the same attachment referenced twice collapses to one entry,
/// so it is copied once.
pub fn extract_embeds(content: &str) -> HashSet<String> {
    EMBED_RE
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .collect()
}
