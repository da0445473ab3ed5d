use std::path::PathBuf;

use super::config::PublishConfig;

/// Fixed locations inside the private and public vaults.
pub struct VaultPaths {
    /// Private vault root (scanned for publishable notes).
    pub private_root: PathBuf,
    /// Public vault root.
    pub public_root: PathBuf,
    /// `<public>/content` — published notes land here, one folder per category.
    pub content_root: PathBuf,
    /// `<private>/04 Resources/Assets/Attachments` — where embeds resolve from.
    pub attachments_src: PathBuf,
    /// `<public>/content/attachments` — flat attachment store for the site.
    pub attachments_dst: PathBuf,
}

impl VaultPaths {
    pub fn from_config(config: &PublishConfig) -> Self {
        let content_root = config.public_root.join("content");
        Self {
            attachments_src: config
                .private_root
                .join("04 Resources")
                .join("Assets")
                .join("Attachments"),
            attachments_dst: content_root.join("attachments"),
            content_root,
            private_root: config.private_root.clone(),
            public_root: config.public_root.clone(),
        }
    }

    /// Destination directory for a note of the given category.
    pub fn category_dir(&self, category: &str) -> PathBuf {
        self.content_root.join(category)
    }
}
