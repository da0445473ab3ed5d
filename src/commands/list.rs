use std::collections::BTreeMap;

use anyhow::Result;
use colored::*;
use serde::Serialize;

use crate::core::config::PublishConfig;
use crate::core::note::collect_public_notes;

#[derive(Serialize)]
struct ListResult {
    total: usize,
    notes: Vec<ListedNote>,
}

#[derive(Serialize)]
struct ListedNote {
    name: String,
    category: String,
    modified: String,
}

/// Dry-run preview: show the notes `publish` would copy, without touching the
/// public vault.
pub fn run(json: bool) -> Result<()> {
    let config = PublishConfig::from_env()?;
    let mut notes = collect_public_notes(&config.private_root)?;
    notes.sort_by(|a, b| (&a.category, &a.file_name).cmp(&(&b.category, &b.file_name)));

    if json {
        let result = ListResult {
            total: notes.len(),
            notes: notes
                .iter()
                .map(|n| ListedNote {
                    name: n.file_name.clone(),
                    category: n.category.clone(),
                    modified: n.modified.to_rfc3339(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", "Publishable Notes".bold());
    println!("{}", "=".repeat(50));
    println!("Vault: {}", config.private_root.display());
    println!("Found: {} notes", notes.len());
    println!();

    if notes.is_empty() {
        println!("{}", "No notes are marked publish: true.".yellow());
        return Ok(());
    }

    let mut by_category: BTreeMap<&str, Vec<_>> = BTreeMap::new();
    for note in &notes {
        by_category.entry(&note.category).or_default().push(note);
    }

    for (category, group) in &by_category {
        println!("{}", category.cyan());
        for note in group {
            println!(
                "  {} {}",
                note.file_name,
                note.modified
                    .format("(%Y-%m-%d %H:%M)")
                    .to_string()
                    .dimmed()
            );
        }
        println!();
    }

    Ok(())
}
