//! Core publishing pipeline: configuration, note selection, and the
//! materializer stages. Everything here is plain synchronous filesystem code;
//! the CLI layer in `commands` only adds terminal output on top.

pub mod config;
pub mod embed;
pub mod error;
pub mod marker;
pub mod note;
pub mod paths;
pub mod pipeline;

pub use config::PublishConfig;
pub use error::PublishError;
pub use paths::VaultPaths;
