use anyhow::Result;
use colored::*;
use serde::Serialize;

use crate::core::config::{PublishConfig, PRIVATE_VAULT_VAR, PUBLIC_VAULT_VAR};
use crate::core::paths::VaultPaths;
use crate::core::pipeline::{
    copy_attachments, copy_notes, strip_markers, AttachmentStats, CopyStats, StripStats,
};

#[derive(Serialize)]
struct PublishSummary {
    private_root: String,
    public_root: String,
    notes: CopyStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachments: Option<AttachmentStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    markers: Option<StripStats>,
}

pub fn run(
    skip_attachments: bool,
    skip_markers: bool,
    replacement: &str,
    json: bool,
) -> Result<()> {
    let config = PublishConfig::from_env()?;
    let paths = VaultPaths::from_config(&config);

    if !json {
        println!("{}", "Second Brain Publish".bold());
        println!("{}", "=".repeat(50));
        println!(
            "{} Vault roots resolved ({} and {})",
            "✓".green(),
            PRIVATE_VAULT_VAR,
            PUBLIC_VAULT_VAR
        );
        println!("  private: {}", paths.private_root.display());
        println!("  public:  {}", paths.public_root.display());
        println!();
    }

    let notes = copy_notes(&paths)?;
    if !json {
        println!(
            "{} Published {} notes into {} categories",
            "✓".green(),
            notes.published.to_string().cyan(),
            notes.categories.to_string().cyan()
        );
    }

    let attachments = if skip_attachments {
        None
    } else {
        let stats = copy_attachments(&paths)?;
        if !json {
            println!(
                "{} Copied {} attachments (scanned {} published notes)",
                "✓".green(),
                stats.copied.to_string().cyan(),
                stats.notes_scanned
            );
        }
        Some(stats)
    };

    let markers = if skip_markers {
        None
    } else {
        let stats = strip_markers(&paths, replacement)?;
        if !json {
            println!(
                "{} Removed {} theme blocks from {} notes",
                "✓".green(),
                stats.blocks_removed.to_string().cyan(),
                stats.files_changed
            );
            for failure in &stats.failures {
                println!(
                    "{} could not process {}: {}",
                    "✗".red(),
                    failure.path,
                    failure.error
                );
            }
        }
        Some(stats)
    };

    let had_failures = markers
        .as_ref()
        .map(|s| !s.failures.is_empty())
        .unwrap_or(false);

    if json {
        let summary = PublishSummary {
            private_root: paths.private_root.display().to_string(),
            public_root: paths.public_root.display().to_string(),
            notes,
            attachments,
            markers,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!();
        if had_failures {
            println!("{}", "Publish finished with per-file failures.".yellow());
        } else {
            println!("{}", "✓ Publish complete!".green());
        }
    }

    if had_failures {
        std::process::exit(1);
    }
    Ok(())
}
