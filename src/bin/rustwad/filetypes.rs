// filetypes.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Common code for identifying Wii file types.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use regex::RegexBuilder;
use rustwad::title::wad::WAD_MAGIC;

#[derive(Debug)]
#[derive(PartialEq)]
pub enum WiiFileType {
    Wad,
    Tmd,
    Ticket,
    CertChain,
}

pub fn identify_file_type(input: &str) -> Option<WiiFileType> {
    let input = Path::new(input);
    let file_name = input.file_name()?.to_str()?;
    let re = RegexBuilder::new(r"^tmd(\.[0-9]+)?$").case_insensitive(true).build().ok()?;
    // == TMD ==
    if re.is_match(file_name) ||
        file_name.eq_ignore_ascii_case("tmd.bin") ||
        input.extension().is_some_and(|f| f.eq_ignore_ascii_case("tmd")) {
        return Some(WiiFileType::Tmd);
    }
    // == Ticket ==
    if input.extension().is_some_and(|f| f.eq_ignore_ascii_case("tik")) ||
        file_name.eq_ignore_ascii_case("ticket.bin") ||
        file_name.eq_ignore_ascii_case("cetk") {
        return Some(WiiFileType::Ticket);
    }
    // == Certificate chain ==
    if input.extension().is_some_and(|f| f.eq_ignore_ascii_case("cert")) ||
        file_name.eq_ignore_ascii_case("cert.sys") {
        return Some(WiiFileType::CertChain);
    }
    // == WAD ==
    if input.extension().is_some_and(|f| f.eq_ignore_ascii_case("wad")) {
        return Some(WiiFileType::Wad);
    }
    // Advanced WAD detection, where we read and compare the first 8 bytes (only if the path exists.)
    if let Ok(mut f) = File::open(input) {
        let mut magic_number = [0u8; 8];
        if f.read_exact(&mut magic_number).is_ok() && magic_number[..4] == WAD_MAGIC.to_be_bytes() &&
            (&magic_number[4..] == b"Is\x00\x00" || &magic_number[4..] == b"ib\x00\x00") {
            return Some(WiiFileType::Wad);
        }
    }

    // == No match found! ==
    None
}
