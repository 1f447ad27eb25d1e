// title/content.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Implements locating, decrypting, and verifying the contents stored in the data section of a WAD.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use sha1::{Sha1, Digest};
use thiserror::Error;
use crate::title::ErrorCode;
use crate::title::crypto::{self, DecryptionError};
use crate::title::ticket::Ticket;
use crate::title::tmd::TMD;
use crate::title::util::align16;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("requested index {index} is out of range (TMD lists {count} contents)")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("content's hash did not match the expected value (was {hash}, expected {expected})")]
    BadHash { hash: String, expected: String },
    #[error("content could not be decrypted")]
    Decryption(#[from] DecryptionError),
    #[error("content of {0} bytes is too large to load into memory")]
    BadAlloc(u64),
    #[error("content file could not be opened")]
    Open(#[source] std::io::Error),
    #[error("content data is not in a valid format")]
    IO(#[from] std::io::Error),
}

impl ContentError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ContentError::IndexOutOfRange { .. } => ErrorCode::OutOfRange,
            ContentError::BadHash { .. } => ErrorCode::HashMismatch,
            ContentError::Decryption(_) => ErrorCode::DecryptionFailed,
            ContentError::BadAlloc(_) => ErrorCode::BadAlloc,
            ContentError::Open(_) => ErrorCode::OpenFailed,
            ContentError::IO(_) => ErrorCode::IoError,
        }
    }
}

/// Whether the SHA-1 hash of decrypted content should be checked against its content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyMode {
    #[default]
    Verify,
    Skip,
}

// Size of a content once padded out to the AES block size, or None if it cannot be represented.
fn padded_size(content_size: u64) -> Option<u64> {
    content_size.checked_add(15).map(|_| align16(content_size))
}

/// Gets the offset of the content at the given position in the content table, relative to the
/// start of the data section. Contents are packed back to back, each padded to 16 bytes.
pub fn content_offset(tmd: &TMD, index: usize) -> Result<u64, ContentError> {
    let records = tmd.content_records();
    if index >= records.len() {
        return Err(ContentError::IndexOutOfRange { index, count: records.len() });
    }
    records[..index].iter().try_fold(0u64, |offset, record| {
        padded_size(record.content_size)
            .and_then(|size| offset.checked_add(size))
            .ok_or(ContentError::BadAlloc(record.content_size))
    })
}

/// Decrypts the content at the given position in the content table. The reader must be positioned
/// at the start of the data section; it is advanced past the requested content.
pub fn extract<R: Read + Seek>(reader: &mut R, tmd: &TMD, ticket: &Ticket, index: usize, verify: VerifyMode) -> Result<Vec<u8>, ContentError> {
    let offset = content_offset(tmd, index)?;
    let record = tmd.content(index).map_err(|_| ContentError::IndexOutOfRange {
        index,
        count: tmd.content_records().len(),
    })?;
    log::debug!("extracting content {index} ({:08X}) at data offset {offset:#x}", record.content_id);
    let skip = i64::try_from(offset).map_err(|_| ContentError::BadAlloc(record.content_size))?;
    reader.seek(SeekFrom::Current(skip))?;
    let padded = padded_size(record.content_size)
        .and_then(|size| usize::try_from(size).ok())
        .ok_or(ContentError::BadAlloc(record.content_size))?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(padded).map_err(|_| ContentError::BadAlloc(record.content_size))?;
    buf.resize(padded, 0);
    reader.read_exact(&mut buf)?;
    crypto::decrypt_content(&mut buf, *ticket.title_key(), record.index)?;
    // The padded size fits in usize, so the unpadded size does too.
    buf.truncate(record.content_size as usize);
    if verify == VerifyMode::Verify {
        let mut hasher = Sha1::new();
        hasher.update(&buf);
        let result = hasher.finalize();
        if result[..] != record.content_hash {
            return Err(ContentError::BadHash { hash: hex::encode(result), expected: hex::encode(record.content_hash) });
        }
    }
    Ok(buf)
}

/// A standalone data section, such as one dumped out of a WAD on its own.
#[derive(Debug)]
pub struct ContentFile {
    file: File,
}

impl ContentFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let file = File::open(path).map_err(ContentError::Open)?;
        Ok(ContentFile { file })
    }

    /// Decrypts the content at the given position in the content table. Contents can be
    /// extracted in any order.
    pub fn extract(&mut self, tmd: &TMD, ticket: &Ticket, index: usize, verify: VerifyMode) -> Result<Vec<u8>, ContentError> {
        self.file.seek(SeekFrom::Start(0))?;
        extract(&mut self.file, tmd, ticket, index, verify)
    }
}
