//! sb-publish library
//!
//! Publishes marked notes from a private Second Brain vault to a public vault.
//!
//! # Modules
//!
//! - `core`: note selection, attachment handling, and the materializer stages

pub mod core;

// Re-exports for convenience
pub use core::config::PublishConfig;
pub use core::embed::extract_embeds;
pub use core::error::PublishError;
pub use core::marker::strip_theme_blocks;
pub use core::note::{collect_public_notes, PublicNote, ROOT_FOLDERS};
pub use core::paths::VaultPaths;
pub use core::pipeline::{copy_attachments, copy_notes, strip_markers};
