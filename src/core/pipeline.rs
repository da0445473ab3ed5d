//! The three materializer stages: note copy, attachment propagation, and
//! marker stripping. Each stage fully consumes the previous stage's output
//! before the next begins; there is no cross-run state beyond the filesystem.

use std::collections::HashSet;
use std::fs::{self, File, FileTimes};
use std::path::Path;

use serde::Serialize;

use super::embed::extract_embeds;
use super::error::PublishError;
use super::marker::strip_theme_blocks;
use super::note::{collect_markdown_files, collect_public_notes};
use super::paths::VaultPaths;

#[derive(Debug, Serialize)]
pub struct CopyStats {
    /// Notes selected and copied into the public vault.
    pub published: usize,
    /// Distinct categories the notes landed in.
    pub categories: usize,
}

#[derive(Debug, Serialize)]
pub struct AttachmentStats {
    /// Published notes scanned for embeds.
    pub notes_scanned: usize,
    /// Attachment files copied.
    pub copied: usize,
}

#[derive(Debug, Serialize)]
pub struct StripStats {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub blocks_removed: usize,
    pub failures: Vec<StripFailure>,
}

/// A per-file failure in the stripping stage. The stage reports these and
/// keeps going; it is the only stage that does not abort on error.
#[derive(Debug, Serialize)]
pub struct StripFailure {
    pub path: String,
    pub error: String,
}

/// Copy every selected note into `<public>/content/<category>/`, overwriting
/// prior copies, and carry the source access/modification times over so the
/// published site reflects when notes were actually edited.
///
/// Re-running is safe: each note is independently overwritten.
pub fn copy_notes(paths: &VaultPaths) -> Result<CopyStats, PublishError> {
    let notes = collect_public_notes(&paths.private_root)?;

    ensure_dir(&paths.content_root)?;

    let mut categories = HashSet::new();
    for note in &notes {
        let category_dir = paths.category_dir(&note.category);
        ensure_dir(&category_dir)?;

        let dst = category_dir.join(&note.file_name);
        fs::copy(&note.path, &dst)
            .map_err(|e| PublishError::io("failed to copy note to", &dst, e))?;
        copy_file_times(&note.path, &dst)?;

        categories.insert(note.category.clone());
    }

    Ok(CopyStats {
        published: notes.len(),
        categories: categories.len(),
    })
}

/// Copy every attachment referenced by a published note into
/// `<public>/content/attachments/`.
///
/// The attachments directory is created fresh on purpose: its contents are
/// derived entirely from the current note set, and merging into a stale
/// directory would leave orphaned files behind. A re-run without clearing it
/// first fails with `AttachmentsDirExists`. A referenced attachment missing
/// from the source directory aborts the stage.
pub fn copy_attachments(paths: &VaultPaths) -> Result<AttachmentStats, PublishError> {
    create_dir_fresh(&paths.attachments_dst)?;

    let published = collect_markdown_files(&paths.content_root)?;
    let mut copied = 0;

    for note_path in &published {
        let content = fs::read_to_string(note_path)
            .map_err(|e| PublishError::io("failed to read", note_path, e))?;

        for name in extract_embeds(&content) {
            let src = paths.attachments_src.join(&name);
            if !src.exists() {
                return Err(PublishError::MissingAttachment {
                    name,
                    note: note_path.clone(),
                    source_dir: paths.attachments_src.clone(),
                });
            }

            let dst = paths.attachments_dst.join(&name);
            fs::copy(&src, &dst)
                .map_err(|e| PublishError::io("failed to copy attachment to", &dst, e))?;
            copied += 1;
        }
    }

    Ok(AttachmentStats {
        notes_scanned: published.len(),
        copied,
    })
}

/// Strip mermaid theme blocks from every published note, rewriting a file
/// only when at least one block was removed.
///
/// Per-file failures (unreadable content, write errors) are collected in the
/// stats instead of aborting, so one bad file cannot block the rest.
pub fn strip_markers(paths: &VaultPaths, replacement: &str) -> Result<StripStats, PublishError> {
    let published = collect_markdown_files(&paths.content_root)?;

    let mut stats = StripStats {
        files_scanned: published.len(),
        files_changed: 0,
        blocks_removed: 0,
        failures: Vec::new(),
    };

    for note_path in &published {
        match strip_file(note_path, replacement) {
            Ok(0) => {}
            Ok(count) => {
                stats.files_changed += 1;
                stats.blocks_removed += count;
            }
            Err(e) => stats.failures.push(StripFailure {
                path: note_path.display().to_string(),
                error: e.to_string(),
            }),
        }
    }

    Ok(stats)
}

fn strip_file(path: &Path, replacement: &str) -> Result<usize, PublishError> {
    let content =
        fs::read_to_string(path).map_err(|e| PublishError::io("failed to read", path, e))?;

    let (stripped, count) = strip_theme_blocks(&content, replacement);
    if count > 0 {
        fs::write(path, stripped).map_err(|e| PublishError::io("failed to write", path, e))?;
    }

    Ok(count)
}

/// Create a directory if absent; no error when it already exists. Used for
/// the content root and every category directory.
pub fn ensure_dir(path: &Path) -> Result<(), PublishError> {
    fs::create_dir_all(path).map_err(|e| PublishError::io("failed to create directory", path, e))
}

/// Create a directory that must not exist yet. Reserved for the attachments
/// directory, whose fresh-only semantics are intentional.
pub fn create_dir_fresh(path: &Path) -> Result<(), PublishError> {
    fs::create_dir(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::AlreadyExists => {
            PublishError::AttachmentsDirExists(path.to_path_buf())
        }
        _ => PublishError::io("failed to create directory", path, e),
    })
}

fn copy_file_times(src: &Path, dst: &Path) -> Result<(), PublishError> {
    let metadata =
        fs::metadata(src).map_err(|e| PublishError::io("failed to read metadata of", src, e))?;
    let accessed = metadata
        .accessed()
        .map_err(|e| PublishError::io("failed to read atime of", src, e))?;
    let modified = metadata
        .modified()
        .map_err(|e| PublishError::io("failed to read mtime of", src, e))?;

    let times = FileTimes::new().set_accessed(accessed).set_modified(modified);
    let file = File::options()
        .write(true)
        .open(dst)
        .map_err(|e| PublishError::io("failed to open", dst, e))?;
    file.set_times(times)
        .map_err(|e| PublishError::io("failed to set times on", dst, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PublishConfig;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    struct Vaults {
        _private: TempDir,
        _public: TempDir,
        paths: VaultPaths,
    }

    fn vaults() -> Vaults {
        let private = TempDir::new().unwrap();
        let public = TempDir::new().unwrap();
        let config = PublishConfig::new(private.path(), public.path());
        Vaults {
            paths: VaultPaths::from_config(&config),
            _private: private,
            _public: public,
        }
    }

    fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn copies_selected_notes_into_category_dirs() {
        let v = vaults();
        write_file(
            &v.paths.private_root,
            "02 Projects/Essays/published.md",
            "publish: true\nbody",
        );
        write_file(
            &v.paths.private_root,
            "02 Projects/Essays/private.md",
            "body only",
        );

        let stats = copy_notes(&v.paths).unwrap();
        assert_eq!(stats.published, 1);
        assert_eq!(stats.categories, 1);

        let dst = v.paths.content_root.join("Essays/published.md");
        assert_eq!(fs::read_to_string(dst).unwrap(), "publish: true\nbody");
        assert!(!v.paths.content_root.join("Essays/private.md").exists());
    }

    #[test]
    fn note_directly_in_root_folder_is_not_materialized() {
        let v = vaults();
        write_file(
            &v.paths.private_root,
            "02 Projects/loose.md",
            "publish: true",
        );

        let stats = copy_notes(&v.paths).unwrap();
        assert_eq!(stats.published, 0);
        assert!(!v.paths.content_root.join("02 Projects").exists());
    }

    #[test]
    fn copy_preserves_source_timestamps() {
        let v = vaults();
        let src = write_file(
            &v.paths.private_root,
            "03 Areas/Tech/note.md",
            "publish: true",
        );

        // Backdate the source so copy time and source mtime cannot coincide.
        let past = SystemTime::now() - Duration::from_secs(7 * 24 * 3600);
        let times = FileTimes::new().set_accessed(past).set_modified(past);
        File::options()
            .write(true)
            .open(&src)
            .unwrap()
            .set_times(times)
            .unwrap();

        copy_notes(&v.paths).unwrap();

        let src_mtime = fs::metadata(&src).unwrap().modified().unwrap();
        let dst_mtime = fs::metadata(v.paths.content_root.join("Tech/note.md"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(src_mtime, dst_mtime);
    }

    #[test]
    fn rerun_overwrites_and_stays_identical() {
        let v = vaults();
        write_file(
            &v.paths.private_root,
            "03 Areas/Tech/note.md",
            "publish: true\nv1",
        );

        copy_notes(&v.paths).unwrap();
        let first = fs::read(v.paths.content_root.join("Tech/note.md")).unwrap();
        copy_notes(&v.paths).unwrap();
        let second = fs::read(v.paths.content_root.join("Tech/note.md")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_embeds_copy_the_attachment_once() {
        let v = vaults();
        write_file(&v.paths.attachments_src, "a.png", "pngbytes");
        fs::create_dir_all(v.paths.content_root.join("Essays")).unwrap();
        write_file(
            &v.paths.content_root,
            "Essays/note.md",
            "![[a.png]] then ![[a.png]] again",
        );

        let stats = copy_attachments(&v.paths).unwrap();
        assert_eq!(stats.notes_scanned, 1);
        assert_eq!(stats.copied, 1);
        assert_eq!(
            fs::read_to_string(v.paths.attachments_dst.join("a.png")).unwrap(),
            "pngbytes"
        );
    }

    #[test]
    fn missing_attachment_aborts_the_stage() {
        let v = vaults();
        fs::create_dir_all(&v.paths.attachments_src).unwrap();
        write_file(&v.paths.content_root, "Essays/note.md", "![[gone.png]]");

        let err = copy_attachments(&v.paths).unwrap_err();
        assert!(matches!(err, PublishError::MissingAttachment { .. }));
    }

    #[test]
    fn attachments_dir_rerun_fails_fresh_only() {
        let v = vaults();
        fs::create_dir_all(&v.paths.content_root).unwrap();

        copy_attachments(&v.paths).unwrap();
        let err = copy_attachments(&v.paths).unwrap_err();
        assert!(matches!(err, PublishError::AttachmentsDirExists(_)));
    }

    #[test]
    fn strips_theme_blocks_in_place() {
        let v = vaults();
        let note = write_file(
            &v.paths.content_root,
            "Tech/note.md",
            "graph %% {\"theme\": \"base\"} %% end",
        );

        let stats = strip_markers(&v.paths, "").unwrap();
        assert_eq!(stats.files_scanned, 1);
        assert_eq!(stats.files_changed, 1);
        assert_eq!(stats.blocks_removed, 1);
        assert!(stats.failures.is_empty());
        assert_eq!(fs::read_to_string(&note).unwrap(), "graph  end");

        // Second pass finds nothing to do.
        let stats = strip_markers(&v.paths, "").unwrap();
        assert_eq!(stats.files_changed, 0);
        assert_eq!(stats.blocks_removed, 0);
    }

    #[test]
    fn strip_failures_do_not_abort_remaining_files() {
        let v = vaults();
        write_file(&v.paths.content_root, "Tech/bad.md", "");
        fs::write(v.paths.content_root.join("Tech/bad.md"), [0xff, 0xfe, 0x00]).unwrap();
        write_file(
            &v.paths.content_root,
            "Tech/good.md",
            "%% {\"theme\": \"base\"} %%",
        );

        let stats = strip_markers(&v.paths, "").unwrap();
        assert_eq!(stats.failures.len(), 1);
        assert_eq!(stats.files_changed, 1);
    }
}
