// title/tmd.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Implements the structures and methods required for TMD parsing.

use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use byteorder::{BigEndian, ReadBytesExt};
use thiserror::Error;
use crate::title::ErrorCode;

#[derive(Debug, Error)]
pub enum TMDError {
    #[error("requested content index {index} is out of range (TMD lists {count} contents)")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("TMD file could not be opened")]
    Open(#[source] std::io::Error),
    #[error("TMD data is not in a valid format")]
    IO(#[from] std::io::Error),
}

impl TMDError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TMDError::IndexOutOfRange { .. } => ErrorCode::OutOfRange,
            TMDError::Open(_) => ErrorCode::OpenFailed,
            TMDError::IO(_) => ErrorCode::BadTmd,
        }
    }
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleType {
    System = 0x00000001,
    Game = 0x00010000,
    Channel = 0x00010001,
    SystemChannel = 0x00010002,
    GameWithChannel = 0x00010004,
    DLC = 0x00010005,
    HiddenChannel = 0x00010008,
}

impl TitleType {
    pub fn from_u32(value: u32) -> Option<TitleType> {
        match value {
            0x00000001 => Some(TitleType::System),
            0x00010000 => Some(TitleType::Game),
            0x00010001 => Some(TitleType::Channel),
            0x00010002 => Some(TitleType::SystemChannel),
            0x00010004 => Some(TitleType::GameWithChannel),
            0x00010005 => Some(TitleType::DLC),
            0x00010008 => Some(TitleType::HiddenChannel),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TitleType::System => "System",
            TitleType::Game => "Game",
            TitleType::Channel => "Channel",
            TitleType::SystemChannel => "System Channel",
            TitleType::GameWithChannel => "Game with Channel",
            TitleType::DLC => "DLC",
            TitleType::HiddenChannel => "Hidden Channel",
        }
    }
}

impl fmt::Display for TitleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    NtscJ = 0,
    NtscU = 1,
    Pal = 2,
    International = 3,
    NtscK = 4,
}

impl Region {
    pub fn from_u16(value: u16) -> Option<Region> {
        match value {
            0 => Some(Region::NtscJ),
            1 => Some(Region::NtscU),
            2 => Some(Region::Pal),
            3 => Some(Region::International),
            4 => Some(Region::NtscK),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Region::NtscJ => "NTSC-J",
            Region::NtscU => "NTSC-U",
            Region::Pal => "PAL",
            Region::International => "International",
            Region::NtscK => "NTSC-K",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single content entry from a TMD's content table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    pub content_id: u32,
    pub index: u16,
    pub content_type: u16,
    /// Size of the decrypted content, before it is padded to the AES block size.
    pub content_size: u64,
    /// SHA-1 hash of the decrypted, unpadded content.
    pub content_hash: [u8; 20],
}

#[derive(Debug, Clone)]
pub struct TMD {
    ios_version: u64,
    title_id: u64,
    title_type: u32,
    group_id: u16,
    region: u16,
    title_version: u16,
    boot_index: u16,
    content_records: Vec<ContentRecord>,
}

impl TMD {
    /// Creates a new TMD instance from the binary data of a TMD file.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TMDError> {
        let mut buf = Cursor::new(data);
        // Skip the signature, issuer, and the version bytes that precede the IOS Title ID.
        buf.seek(SeekFrom::Start(0x184))?;
        let ios_version = buf.read_u64::<BigEndian>()?;
        let title_id = buf.read_u64::<BigEndian>()?;
        let title_type = buf.read_u32::<BigEndian>()?;
        let group_id = buf.read_u16::<BigEndian>()?;
        buf.seek(SeekFrom::Current(2))?;
        let region = buf.read_u16::<BigEndian>()?;
        // Skip ratings, IPC mask, reserved data, and access rights.
        buf.seek(SeekFrom::Start(0x1DC))?;
        let title_version = buf.read_u16::<BigEndian>()?;
        let num_contents = buf.read_u16::<BigEndian>()?;
        let boot_index = buf.read_u16::<BigEndian>()?;
        buf.seek(SeekFrom::Current(2))?;
        // Build content records by iterating over the rest of the data num_contents times.
        let mut content_records = Vec::with_capacity(num_contents as usize);
        for _ in 0..num_contents {
            let content_id = buf.read_u32::<BigEndian>()?;
            let index = buf.read_u16::<BigEndian>()?;
            let content_type = buf.read_u16::<BigEndian>()?;
            let content_size = buf.read_u64::<BigEndian>()?;
            let mut content_hash = [0u8; 20];
            buf.read_exact(&mut content_hash)?;
            content_records.push(ContentRecord {
                content_id,
                index,
                content_type,
                content_size,
                content_hash,
            });
        }
        log::debug!("parsed TMD for {title_id:016X} with {num_contents} contents");
        Ok(TMD {
            ios_version,
            title_id,
            title_type,
            group_id,
            region,
            title_version,
            boot_index,
            content_records,
        })
    }

    /// Opens and parses a standalone TMD file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TMDError> {
        let mut file = File::open(path).map_err(TMDError::Open)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        TMD::from_bytes(&data)
    }

    /// Gets the Title ID of the IOS the title runs on.
    pub fn ios_version(&self) -> u64 {
        self.ios_version
    }

    pub fn title_id(&self) -> u64 {
        self.title_id
    }

    /// Gets the type of the title, or None if the type is not one that is known.
    pub fn title_type(&self) -> Option<TitleType> {
        TitleType::from_u32(self.title_type)
    }

    pub fn title_type_raw(&self) -> u32 {
        self.title_type
    }

    pub fn title_type_name(&self) -> &'static str {
        self.title_type().map_or("Unknown Type", |t| t.name())
    }

    pub fn group_id(&self) -> u16 {
        self.group_id
    }

    /// Gets the region of the title, or None if the region is not one that is known.
    pub fn region(&self) -> Option<Region> {
        Region::from_u16(self.region)
    }

    pub fn region_raw(&self) -> u16 {
        self.region
    }

    pub fn region_name(&self) -> &'static str {
        self.region().map_or("Unknown Region", |r| r.name())
    }

    pub fn title_version(&self) -> u16 {
        self.title_version
    }

    /// Gets the index of the content that is loaded when the title is launched.
    pub fn boot_index(&self) -> u16 {
        self.boot_index
    }

    pub fn content_count(&self) -> u16 {
        self.content_records.len() as u16
    }

    /// Gets the content record at the given position in the content table.
    pub fn content(&self, index: usize) -> Result<&ContentRecord, TMDError> {
        self.content_records.get(index).ok_or(TMDError::IndexOutOfRange {
            index,
            count: self.content_records.len(),
        })
    }

    pub fn content_records(&self) -> &[ContentRecord] {
        &self.content_records
    }
}
