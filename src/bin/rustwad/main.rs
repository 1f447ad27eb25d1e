// main.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Base for the rustwad CLI that handles argument parsing and directs execution to the proper module.

mod filetypes;
mod info;
mod wad;

use anyhow::Result;
use clap::{Subcommand, Parser};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
#[command(arg_required_else_help = true)]
enum Commands {
    /// Extract the decrypted contents or the raw sections of a WAD
    Extract {
        /// The path to the WAD to extract
        input: String,
        /// An (optional) base name for extracted files; defaults to the short form of the Title ID
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        range: wad::ExtractRange,
        /// Skip checking the hash of each content after decrypting it
        #[arg(short, long)]
        ignore_hashes: bool,
        /// Report contents that fail to extract and continue with the next one
        #[arg(short, long)]
        keep_going: bool,
        /// Only report errors
        #[arg(short, long)]
        quiet: bool,
        /// Extract each raw section of the WAD instead of its contents
        #[arg(short, long)]
        sections: bool,
    },
    /// Get information about a WAD, Ticket, TMD, or certificate chain
    Info {
        /// The path to a WAD, Ticket, TMD, or certificate chain
        input: String,
        #[command(flatten)]
        parts: info::InfoParts,
    },
    /// Decrypt every content in a WAD and check it against its hash
    Verify {
        /// The path to the WAD to verify
        input: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("rustwad library version {}", rustwad::version());

    match &cli.command {
        Some(Commands::Extract { input, output, range, ignore_hashes, keep_going, quiet, sections }) => {
            let options = wad::ExtractOptions {
                ignore_hashes: *ignore_hashes,
                keep_going: *keep_going,
                quiet: *quiet,
            };
            if *sections {
                wad::extract_sections(input, output, &options)?
            } else {
                wad::extract_contents(input, output, range, &options)?
            }
        },
        Some(Commands::Info { input, parts }) => {
            info::info(input, parts)?
        },
        Some(Commands::Verify { input }) => {
            wad::verify_wad(input)?
        },
        None => { /* Clap handles no passed command by itself */}
    }
    Ok(())
}
