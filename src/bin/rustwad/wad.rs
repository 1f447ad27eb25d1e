// wad.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Code for the WAD extraction and verification commands in the rustwad CLI.

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use clap::Args;
use rustwad::title::content::VerifyMode;
use rustwad::title::util::title_id_to_string;
use rustwad::title::wad::{WAD, WADSection};

#[derive(Args)]
#[clap(next_help_heading = "Content Range")]
pub struct ExtractRange {
    /// Index of the first content to extract
    #[arg(short, long, conflicts_with = "entry")]
    from: Option<u16>,
    /// Index of the last content to extract
    #[arg(short, long, conflicts_with = "entry")]
    to: Option<u16>,
    /// Extract only the content with this index
    #[arg(short = 'n', long)]
    entry: Option<u16>,
}

impl ExtractRange {
    /// Resolves the range to a half-open range of content indices, checked against the number of
    /// contents in the title.
    fn resolve(&self, count: u16) -> Result<(usize, usize)> {
        let count = count as usize;
        let (from, to) = match self.entry {
            Some(entry) => (entry as usize, entry as usize + 1),
            None => (
                self.from.map_or(0, |f| f as usize),
                self.to.map_or(count, |t| t as usize + 1),
            ),
        };
        if to <= from {
            bail!("Bad range given.");
        }
        if from >= count || to > count {
            bail!("Limits exceed number of contents ({}).", count);
        }
        Ok((from, to))
    }
}

pub struct ExtractOptions {
    pub ignore_hashes: bool,
    pub keep_going: bool,
    pub quiet: bool,
}

fn open_wad(input: &str) -> Result<WAD<fs::File>> {
    let in_path = Path::new(input);
    if !in_path.exists() {
        bail!("Source WAD \"{}\" could not be found.", in_path.display());
    }
    let wad = WAD::open(in_path).with_context(|| format!("Failed to open \"{}\".", in_path.display()))?;
    Ok(wad)
}

// Base name for extracted files, defaulting to the short form of the Title ID.
fn output_base(wad: &WAD<fs::File>, output: &Option<String>) -> String {
    output.clone().unwrap_or_else(|| title_id_to_string(wad.tmd().title_id()))
}

fn content_file_name(base: &str, index: usize, single: bool, named: bool) -> PathBuf {
    if single {
        if named {
            PathBuf::from(base)
        } else {
            PathBuf::from(format!("{}.bin", base))
        }
    } else {
        PathBuf::from(format!("{}-{:04}.bin", base, index))
    }
}

pub fn extract_contents(input: &str, output: &Option<String>, range: &ExtractRange, options: &ExtractOptions) -> Result<()> {
    let mut wad = open_wad(input)?;
    let base = output_base(&wad, output);
    let (from, to) = range.resolve(wad.tmd().content_count())?;
    let verify = if options.ignore_hashes { VerifyMode::Skip } else { VerifyMode::Verify };
    for index in from..to {
        if !options.quiet {
            print!("Extracting content {:2}...", index);
        }
        let content = match wad.extract_content(index, verify) {
            Ok(content) => content,
            Err(err) if options.keep_going => {
                println!("Error: {}", err.code().message());
                continue;
            },
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to extract entry {}.", index));
            }
        };
        let out_path = content_file_name(&base, index, from + 1 == to, output.is_some());
        if let Err(err) = fs::write(&out_path, content) {
            if options.keep_going {
                println!("Error: Failed to write \"{}\"", out_path.display());
                continue;
            }
            return Err(err).with_context(|| format!("Failed to write entry {}.", index));
        }
        if !options.quiet {
            println!("Ok");
        }
    }
    println!("\nDone.");
    Ok(())
}

pub fn extract_sections(input: &str, output: &Option<String>, options: &ExtractOptions) -> Result<()> {
    let mut wad = open_wad(input)?;
    let base = output_base(&wad, output);
    for section in WADSection::ALL {
        if !options.quiet {
            print!("Extracting {}...", section);
        }
        if wad.section_size(section) == 0 {
            if !options.quiet {
                println!("Empty");
            }
            continue;
        }
        let out_path = PathBuf::from(format!("{}-{}.bin", base, section));
        let result = wad.read_section(section)
            .with_context(|| format!("Failed to read the {} section.", section))
            .and_then(|data| fs::write(&out_path, data)
                .with_context(|| format!("Failed to open file for writing \"{}\".", out_path.display())));
        match result {
            Ok(()) => {
                if !options.quiet {
                    println!("Ok");
                }
            },
            Err(err) if options.keep_going => println!("Error: {:#}", err),
            Err(err) => return Err(err),
        }
    }
    wad.close();
    Ok(())
}

pub fn verify_wad(input: &str) -> Result<()> {
    let mut wad = open_wad(input)?;
    println!("Opened successfully");
    let mut failed = false;
    for index in 0..wad.tmd().content_count() as usize {
        print!("Content {:2}...", index);
        match wad.extract_content(index, VerifyMode::Verify) {
            Ok(_) => println!("Ok"),
            Err(err) => {
                println!("Error: {}", err.code().message());
                failed = true;
            }
        }
    }
    wad.close();
    if failed {
        bail!("Failed to verify.");
    }
    println!("Verified");
    Ok(())
}
