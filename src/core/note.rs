use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use walkdir::WalkDir;

use super::error::PublishError;

/// Top-level vault folders. A note sitting directly inside one of these (no
/// intervening subfolder) has no category yet and is never published.
pub const ROOT_FOLDERS: [&str; 5] = [
    "01 Inbox",
    "02 Projects",
    "03 Areas",
    "04 Resources",
    "05 Archive",
];

/// Notes under a `Templates` folder are scaffolding, never published.
pub const TEMPLATES_DIR: &str = "Templates";

/// The line marking a note as public. Matched as a substring, anywhere in the
/// file.
pub const PUBLISH_MARKER: &str = "publish: true";

/// A note that passed selection and will be materialized into the public vault.
#[derive(Debug, Clone)]
pub struct PublicNote {
    /// Absolute path in the private vault.
    pub path: PathBuf,
    /// File name including extension.
    pub file_name: String,
    /// Immediate parent folder name, used as the publication category.
    pub category: String,
    /// Source modification time, shown by `list` and propagated onto copies.
    pub modified: DateTime<Local>,
}

/// Walk the private vault and return every note eligible for publication.
///
/// A note is selected iff it is not under `Templates`, contains the publish
/// marker, and its parent folder is not one of the top-level roots. Order is
/// filesystem traversal order and not guaranteed stable.
pub fn collect_public_notes(private_root: &Path) -> Result<Vec<PublicNote>, PublishError> {
    let mut notes = Vec::new();

    for path in collect_markdown_files(private_root)? {
        let category = parent_name(&path);
        if category == TEMPLATES_DIR {
            continue;
        }
        if !is_note_public(&path)? {
            continue;
        }
        if ROOT_FOLDERS.contains(&category.as_str()) {
            continue;
        }

        let metadata = fs::metadata(&path)
            .map_err(|e| PublishError::io("failed to read metadata of", &path, e))?;
        let modified = metadata
            .modified()
            .map_err(|e| PublishError::io("failed to read mtime of", &path, e))?;

        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        notes.push(PublicNote {
            file_name,
            category,
            modified: DateTime::from(modified),
            path,
        });
    }

    Ok(notes)
}

/// All `.md` files under `root`, recursively.
pub fn collect_markdown_files(root: &Path) -> Result<Vec<PathBuf>, PublishError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| PublishError::Walk {
            root: root.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().map(|e| e == "md").unwrap_or(false) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Scan a note line by line for the publish marker, short-circuiting on the
/// first hit. No marker anywhere means the note stays private.
pub fn is_note_public(path: &Path) -> Result<bool, PublishError> {
    let file = File::open(path).map_err(|e| PublishError::io("failed to open", path, e))?;
    let reader = BufReader::new(file);

    for line in reader.lines() {
        let line = line.map_err(|e| PublishError::io("failed to read", path, e))?;
        if line.contains(PUBLISH_MARKER) {
            return Ok(true);
        }
    }

    Ok(false)
}

fn parent_name(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_note(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn marked_note_in_subfolder_is_selected() {
        let vault = TempDir::new().unwrap();
        write_note(
            vault.path(),
            "02 Projects/Essays/draft.md",
            "---\npublish: true\n---\nbody",
        );

        let notes = collect_public_notes(vault.path()).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].category, "Essays");
        assert_eq!(notes[0].file_name, "draft.md");
    }

    #[test]
    fn unmarked_note_is_never_selected() {
        let vault = TempDir::new().unwrap();
        write_note(
            vault.path(),
            "02 Projects/Essays/private.md",
            "---\ntags: []\n---\nno marker here",
        );

        assert!(collect_public_notes(vault.path()).unwrap().is_empty());
    }

    #[test]
    fn note_directly_in_root_folder_is_excluded() {
        let vault = TempDir::new().unwrap();
        write_note(
            vault.path(),
            "02 Projects/loose.md",
            "publish: true\nnot yet categorized",
        );

        assert!(collect_public_notes(vault.path()).unwrap().is_empty());
    }

    #[test]
    fn templates_are_excluded_even_when_marked() {
        let vault = TempDir::new().unwrap();
        write_note(
            vault.path(),
            "04 Resources/Templates/note-template.md",
            "publish: true",
        );

        assert!(collect_public_notes(vault.path()).unwrap().is_empty());
    }

    #[test]
    fn marker_deep_in_the_file_still_counts() {
        let vault = TempDir::new().unwrap();
        let body = format!("{}\npublish: true\n", "filler line\n".repeat(500));
        write_note(vault.path(), "03 Areas/Tech/late-marker.md", &body);

        let notes = collect_public_notes(vault.path()).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].category, "Tech");
    }

    #[test]
    fn non_markdown_files_are_ignored() {
        let vault = TempDir::new().unwrap();
        write_note(vault.path(), "03 Areas/Tech/data.csv", "publish: true");

        assert!(collect_public_notes(vault.path()).unwrap().is_empty());
    }
}
