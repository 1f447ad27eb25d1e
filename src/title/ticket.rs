// title/ticket.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Implements the structures and methods required for Ticket parsing and Title Key decryption.

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use byteorder::{BigEndian, ReadBytesExt};
use thiserror::Error;
use crate::title::ErrorCode;
use crate::title::commonkeys::CommonKey;
use crate::title::crypto::{decrypt_title_key, DecryptionError};

#[derive(Debug, Error)]
pub enum TicketError {
    #[error("Title Key could not be decrypted")]
    Decryption(#[from] DecryptionError),
    #[error("Ticket file could not be opened")]
    Open(#[source] std::io::Error),
    #[error("Ticket data is not in a valid format")]
    IO(#[from] std::io::Error),
}

impl TicketError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TicketError::Open(_) => ErrorCode::OpenFailed,
            TicketError::Decryption(_) | TicketError::IO(_) => ErrorCode::BadTicket,
        }
    }
}

#[derive(Debug, Clone)]
/// A structure that represents the fields of a Wii Ticket needed to decrypt a title. The Title Key
/// is decrypted as soon as the Ticket is parsed, and the encrypted form is not kept.
pub struct Ticket {
    issuer: [u8; 64],
    ticket_id: [u8; 8],
    console_id: [u8; 4],
    title_id: [u8; 8],
    title_version: u16,
    common_key_index: u8,
    common_key: CommonKey,
    title_key: [u8; 16],
}

impl Ticket {
    /// Creates a new Ticket instance from the binary data of a Ticket file.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TicketError> {
        let mut buf = Cursor::new(data);
        // Skip the signature type, signature, and its padding.
        buf.seek(SeekFrom::Start(0x140))?;
        let mut issuer = [0u8; 64];
        buf.read_exact(&mut issuer)?;
        // Skip the ECDH data, Ticket version, and reserved bytes.
        buf.seek(SeekFrom::Current(0x3c + 0x03))?;
        let mut title_key_enc = [0u8; 16];
        buf.read_exact(&mut title_key_enc)?;
        buf.seek(SeekFrom::Current(1))?;
        let mut ticket_id = [0u8; 8];
        buf.read_exact(&mut ticket_id)?;
        let mut console_id = [0u8; 4];
        buf.read_exact(&mut console_id)?;
        let mut title_id = [0u8; 8];
        buf.read_exact(&mut title_id)?;
        buf.seek(SeekFrom::Current(2))?;
        let title_version = buf.read_u16::<BigEndian>()?;
        // Skip the permitted titles mask, permit mask, and title export flag.
        buf.seek(SeekFrom::Current(4 + 4 + 1))?;
        let common_key_index = buf.read_u8()?;
        let common_key = CommonKey::select(common_key_index, &issuer);
        let title_key = decrypt_title_key(title_key_enc, common_key, title_id)?;
        log::debug!("decrypted Title Key for {} using {:?} common key", hex::encode(title_id), common_key);
        Ok(Ticket {
            issuer,
            ticket_id,
            console_id,
            title_id,
            title_version,
            common_key_index,
            common_key,
            title_key,
        })
    }

    /// Opens and parses a standalone Ticket file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TicketError> {
        let mut file = File::open(path).map_err(TicketError::Open)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ticket::from_bytes(&data)
    }

    /// Gets the name of the certificate used to sign a Ticket as a string.
    pub fn issuer(&self) -> String {
        String::from_utf8_lossy(&self.issuer).trim_end_matches('\0').to_owned()
    }

    /// Gets the raw, fixed-width issuer field. It is not guaranteed to contain a NUL.
    pub fn issuer_bytes(&self) -> &[u8; 64] {
        &self.issuer
    }

    /// Gets the Title ID of the Ticket.
    pub fn title_id(&self) -> u64 {
        u64::from_be_bytes(self.title_id)
    }

    /// Gets the Title ID of the Ticket as it is stored on disk.
    pub fn title_id_bytes(&self) -> [u8; 8] {
        self.title_id
    }

    /// Gets the Ticket ID listed in the Ticket.
    pub fn ticket_id(&self) -> [u8; 8] {
        self.ticket_id
    }

    /// Gets the console ID listed in the Ticket.
    pub fn console_id(&self) -> [u8; 4] {
        self.console_id
    }

    /// Gets the version of the title listed in the Ticket.
    pub fn title_version(&self) -> u16 {
        self.title_version
    }

    /// Gets the raw common key index byte stored in the Ticket.
    pub fn common_key_index(&self) -> u8 {
        self.common_key_index
    }

    /// Gets the common key that was actually used to decrypt the Title Key.
    pub fn common_key(&self) -> CommonKey {
        self.common_key
    }

    /// Gets the decrypted Title Key.
    pub fn title_key(&self) -> &[u8; 16] {
        &self.title_key
    }
}
