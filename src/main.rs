mod commands;
mod core;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sbpub")]
#[command(about = "Publish marked notes from a private Second Brain vault to a public vault", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: copy notes, copy attachments, strip theme blocks
    Publish {
        #[arg(long, help = "Skip attachment propagation")]
        skip_attachments: bool,
        #[arg(long, help = "Skip mermaid theme block stripping")]
        skip_markers: bool,
        #[arg(
            long,
            default_value = "",
            help = "Replacement text for stripped theme blocks"
        )]
        replacement: String,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Preview which notes would be published (no writes)
    List {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Publish {
            skip_attachments,
            skip_markers,
            replacement,
            json,
        } => commands::publish::run(skip_attachments, skip_markers, &replacement, json),
        Commands::List { json } => commands::list::run(json),
    }
}
