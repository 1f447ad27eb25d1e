// info.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Code for the info command in the rustwad CLI.

use std::fs::File;
use std::path::Path;
use anyhow::{bail, Context, Result};
use clap::Args;
use rustwad::title::cert::CertificateChain;
use rustwad::title::ticket::Ticket;
use rustwad::title::tmd::TMD;
use rustwad::title::util::title_id_to_string;
use rustwad::title::wad::{WAD, WADSection, WADType};
use crate::filetypes::{WiiFileType, identify_file_type};

#[derive(Args)]
#[clap(next_help_heading = "WAD Sections")]
pub struct InfoParts {
    /// Only show the certificate chain of a WAD
    #[arg(short, long)]
    certs: bool,
    /// Only show the Ticket of a WAD
    #[arg(short, long)]
    ticket: bool,
    /// Only show the TMD of a WAD
    #[arg(short = 'm', long)]
    tmd: bool,
}

impl InfoParts {
    // Showing nothing in particular means showing everything.
    fn all(&self) -> bool {
        !self.certs && !self.ticket && !self.tmd
    }
}

fn print_cert_chain_info(cert_chain: &CertificateChain) {
    println!("Certificate Chain Info");
    println!("  Total Certificates: {}", cert_chain.cert_count());
    for cert in cert_chain.iter() {
        println!("    Certificate: {}", cert.child_cert());
        println!("      Issuer: {}", cert.issuer());
        println!("      Signature Type: {:?}", cert.signature_type());
        println!("      Key Type: {:?}", cert.key_type());
    }
}

fn print_ticket_info(ticket: &Ticket) {
    println!("Ticket Info");
    println!("  Title ID: {:016X} ({})", ticket.title_id(), title_id_to_string(ticket.title_id()));
    println!("  Title Version: {}", ticket.title_version());
    println!("  Ticket ID: {}", hex::encode(ticket.ticket_id()).to_uppercase());
    println!("  Console ID: {}", hex::encode(ticket.console_id()).to_uppercase());
    println!("  Certificate: {}", ticket.issuer());
    println!("  Decryption Key: {} (key type {})", ticket.common_key().name(), ticket.common_key_index());
    println!("  Title Key (Decrypted): {}", hex::encode(ticket.title_key()));
}

fn print_tmd_info(tmd: &TMD) {
    println!("Title Info");
    println!("  Title ID: {:016X} ({})", tmd.title_id(), title_id_to_string(tmd.title_id()));
    println!("  Title Version: {}", tmd.title_version());
    if tmd.ios_version() == 0 {
        println!("  Required IOS: N/A");
    } else {
        println!("  Required IOS: IOS{} ({:016X})", tmd.ios_version() & 0xFF, tmd.ios_version());
    }
    println!("  Title Type: {} ({:08X})", tmd.title_type_name(), tmd.title_type_raw());
    println!("  Region: {} ({})", tmd.region_name(), tmd.region_raw());
    println!("  Group ID: {:04X}", tmd.group_id());
    println!("\nContent Info");
    println!("  Total Contents: {}", tmd.content_count());
    println!("  Boot Content Index: {}", tmd.boot_index());
    println!("  Content Records:");
    for content in tmd.content_records() {
        println!("    Content Index: {}", content.index);
        println!("      Content ID: {:08X}", content.content_id);
        println!("      Content Type: {:04X}", content.content_type);
        println!("      Content Size: {} bytes", content.content_size);
        println!("      Content Hash: {}", hex::encode(content.content_hash));
    }
}

fn print_wad_info(wad: &WAD<File>, parts: &InfoParts) {
    if parts.all() {
        println!("WAD Info");
        match wad.header().wad_type_kind() {
            Some(WADType::ImportBoot) => println!("  WAD Type: boot2"),
            Some(WADType::Installable) => println!("  WAD Type: Standard Installable"),
            None => println!("  WAD Type: Unknown ({:08X})", wad.wad_type()),
        }
        println!("  Sections:");
        for section in WADSection::ALL {
            println!("    {:<10} offset {:#010x}, size {:#x}", section.name(), wad.section_offset(section), wad.section_size(section));
        }
        println!("  Has Footer: {}", wad.section_size(WADSection::Footer) != 0);
        println!();
    }
    if parts.all() || parts.certs {
        print_cert_chain_info(wad.cert_chain());
        println!();
    }
    if parts.all() || parts.ticket {
        print_ticket_info(wad.ticket());
        println!();
    }
    if parts.all() || parts.tmd {
        print_tmd_info(wad.tmd());
    }
}

pub fn info(input: &str, parts: &InfoParts) -> Result<()> {
    let in_path = Path::new(input);
    if !in_path.exists() {
        bail!("Input file \"{}\" does not exist.", in_path.display());
    }
    match identify_file_type(input) {
        Some(WiiFileType::Tmd) => {
            let tmd = TMD::open(in_path).with_context(|| "The provided TMD file could not be parsed, and is likely invalid.")?;
            print_tmd_info(&tmd);
        },
        Some(WiiFileType::Ticket) => {
            let ticket = Ticket::open(in_path).with_context(|| "The provided Ticket file could not be parsed, and is likely invalid.")?;
            print_ticket_info(&ticket);
        },
        Some(WiiFileType::CertChain) => {
            let cert_chain = CertificateChain::open(in_path).with_context(|| "The provided certificate chain could not be parsed, and is likely invalid.")?;
            print_cert_chain_info(&cert_chain);
        },
        Some(WiiFileType::Wad) => {
            let wad = WAD::open(in_path).with_context(|| "The provided WAD file could not be parsed, and is likely invalid.")?;
            print_wad_info(&wad, parts);
        },
        None => {
            bail!("Information cannot be displayed for this file.");
        }
    }
    Ok(())
}
