// title/wad.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Implements the structures and methods required for WAD parsing and content extraction.

use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use byteorder::{BigEndian, ReadBytesExt};
use thiserror::Error;
use crate::title::ErrorCode;
use crate::title::cert::{CertificateChain, CertificateError};
use crate::title::content::{self, ContentError, VerifyMode};
use crate::title::ticket::{Ticket, TicketError};
use crate::title::tmd::{TMD, TMDError};
use crate::title::util::align64;

/// The value stored in the first word of every WAD header, which is also the header's size.
pub const WAD_MAGIC: u32 = 0x20;
const HEADER_SIZE: u32 = 0x20;

#[derive(Debug, Error)]
pub enum WADError {
    #[error("WAD file could not be opened")]
    Open(#[source] std::io::Error),
    #[error("WAD header has bad magic `{0:#x}`, file might not be in WAD format")]
    BadMagic(u32),
    #[error("an error occurred while loading the certificate chain")]
    BadCertchain(#[source] CertificateError),
    #[error("an error occurred while loading Ticket data")]
    BadTicket(#[source] TicketError),
    #[error("an error occurred while loading TMD data")]
    BadTmd(#[source] TMDError),
    #[error("content could not be extracted")]
    Content(#[from] ContentError),
    #[error("the provided WAD data was invalid")]
    IO(#[from] std::io::Error),
}

impl WADError {
    pub fn code(&self) -> ErrorCode {
        match self {
            WADError::Open(_) => ErrorCode::OpenFailed,
            WADError::BadMagic(_) => ErrorCode::BadMagic,
            WADError::BadCertchain(_) => ErrorCode::BadCertchain,
            WADError::BadTicket(_) => ErrorCode::BadTicket,
            WADError::BadTmd(_) => ErrorCode::BadTmd,
            WADError::Content(err) => err.code(),
            WADError::IO(_) => ErrorCode::IoError,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WADType {
    Installable,
    ImportBoot,
}

impl WADType {
    pub fn from_u32(value: u32) -> Option<WADType> {
        match &value.to_be_bytes()[..2] {
            b"Is" => Some(WADType::Installable),
            b"ib" => Some(WADType::ImportBoot),
            _ => None,
        }
    }
}

/// The sections of a WAD, in the order they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WADSection {
    Header,
    CertChain,
    Ticket,
    TMD,
    Data,
    Footer,
}

impl WADSection {
    pub const ALL: [WADSection; 6] = [
        WADSection::Header,
        WADSection::CertChain,
        WADSection::Ticket,
        WADSection::TMD,
        WADSection::Data,
        WADSection::Footer,
    ];

    /// Gets the section at the given position in the WAD, or None if there is no such section.
    pub fn from_index(index: u32) -> Option<WADSection> {
        WADSection::ALL.get(index as usize).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            WADSection::Header => "header",
            WADSection::CertChain => "certchain",
            WADSection::Ticket => "ticket",
            WADSection::TMD => "tmd",
            WADSection::Data => "data",
            WADSection::Footer => "footer",
        }
    }
}

impl fmt::Display for WADSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WADHeader {
    wad_type: u32,
    cert_chain_size: u32,
    ticket_size: u32,
    tmd_size: u32,
    data_size: u32,
    footer_size: u32,
}

impl WADHeader {
    /// Creates a new WADHeader instance from the first 0x20 bytes of a WAD.
    pub fn from_bytes(data: &[u8]) -> Result<WADHeader, WADError> {
        let mut buf = Cursor::new(data);
        WADHeader::read(&mut buf)
    }

    fn read<R: Read>(buf: &mut R) -> Result<WADHeader, WADError> {
        let magic = buf.read_u32::<BigEndian>()?;
        if magic != WAD_MAGIC {
            return Err(WADError::BadMagic(magic));
        }
        let wad_type = buf.read_u32::<BigEndian>()?;
        let cert_chain_size = buf.read_u32::<BigEndian>()?;
        // Skip the reserved word.
        buf.read_u32::<BigEndian>()?;
        let ticket_size = buf.read_u32::<BigEndian>()?;
        let tmd_size = buf.read_u32::<BigEndian>()?;
        let data_size = buf.read_u32::<BigEndian>()?;
        let footer_size = buf.read_u32::<BigEndian>()?;
        Ok(WADHeader {
            wad_type,
            cert_chain_size,
            ticket_size,
            tmd_size,
            data_size,
            footer_size,
        })
    }

    /// Gets the raw type field of the WAD, which is normally "Is" or "ib" followed by two NULs.
    pub fn wad_type(&self) -> u32 {
        self.wad_type
    }

    pub fn wad_type_kind(&self) -> Option<WADType> {
        WADType::from_u32(self.wad_type)
    }

    /// Gets the size of a section as listed in the header. The header itself is always 0x20 bytes.
    pub fn section_size(&self, section: WADSection) -> u32 {
        match section {
            WADSection::Header => HEADER_SIZE,
            WADSection::CertChain => self.cert_chain_size,
            WADSection::Ticket => self.ticket_size,
            WADSection::TMD => self.tmd_size,
            WADSection::Data => self.data_size,
            WADSection::Footer => self.footer_size,
        }
    }

    /// Gets the offset of a section from the start of the WAD. Every section starts on a 64-byte
    /// boundary, so this is the sum of the aligned sizes of every section before it.
    pub fn section_offset(&self, section: WADSection) -> u64 {
        WADSection::ALL.iter()
            .take_while(|&&s| s != section)
            .map(|&s| align64(self.section_size(s) as u64))
            .sum()
    }
}

/// A parsed WAD. The certificate chain, Ticket, and TMD are loaded when the WAD is opened, while
/// content is read from the underlying reader on demand.
#[derive(Debug)]
pub struct WAD<R> {
    header: WADHeader,
    cert_chain: CertificateChain,
    ticket: Ticket,
    tmd: TMD,
    reader: R,
}

// Reads an entire section, failing if the reader ends before the section does.
fn read_section_bytes<R: Read + Seek>(reader: &mut R, offset: u64, size: u32) -> Result<Vec<u8>, std::io::Error> {
    reader.seek(SeekFrom::Start(offset))?;
    let mut buf = Vec::new();
    reader.take(size as u64).read_to_end(&mut buf)?;
    if buf.len() != size as usize {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("section at {offset:#x} ended after {} of {size} bytes", buf.len()),
        ));
    }
    Ok(buf)
}

impl WAD<File> {
    /// Opens and parses the WAD at the given path. The file stays open until the WAD is closed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<WAD<File>, WADError> {
        let file = File::open(path).map_err(WADError::Open)?;
        WAD::from_reader(file)
    }
}

impl<R: Read + Seek> WAD<R> {
    /// Parses a WAD from any seekable reader, which is kept for extracting content later.
    pub fn from_reader(mut reader: R) -> Result<WAD<R>, WADError> {
        reader.seek(SeekFrom::Start(0))?;
        let header = WADHeader::read(&mut reader)?;
        for section in WADSection::ALL {
            log::debug!("{section} section: offset {:#x}, size {:#x}", header.section_offset(section), header.section_size(section));
        }
        let cert_chain_data = read_section_bytes(&mut reader, header.section_offset(WADSection::CertChain), header.cert_chain_size)?;
        let cert_chain = CertificateChain::from_bytes(&cert_chain_data).map_err(WADError::BadCertchain)?;
        let ticket_data = read_section_bytes(&mut reader, header.section_offset(WADSection::Ticket), header.ticket_size)?;
        let ticket = Ticket::from_bytes(&ticket_data).map_err(WADError::BadTicket)?;
        let tmd_data = read_section_bytes(&mut reader, header.section_offset(WADSection::TMD), header.tmd_size)?;
        let tmd = TMD::from_bytes(&tmd_data).map_err(WADError::BadTmd)?;
        Ok(WAD {
            header,
            cert_chain,
            ticket,
            tmd,
            reader,
        })
    }

    pub fn header(&self) -> &WADHeader {
        &self.header
    }

    pub fn wad_type(&self) -> u32 {
        self.header.wad_type()
    }

    pub fn section_offset(&self, section: WADSection) -> u64 {
        self.header.section_offset(section)
    }

    pub fn section_size(&self, section: WADSection) -> u32 {
        self.header.section_size(section)
    }

    pub fn cert_chain(&self) -> &CertificateChain {
        &self.cert_chain
    }

    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    pub fn tmd(&self) -> &TMD {
        &self.tmd
    }

    /// Decrypts the content at the given position in the TMD's content table. Contents can be
    /// extracted in any order.
    pub fn extract_content(&mut self, index: usize, verify: VerifyMode) -> Result<Vec<u8>, WADError> {
        self.reader.seek(SeekFrom::Start(self.header.section_offset(WADSection::Data)))?;
        let content = content::extract(&mut self.reader, &self.tmd, &self.ticket, index, verify)?;
        Ok(content)
    }

    /// Reads the raw bytes of a section, exactly as they are stored in the WAD.
    pub fn read_section(&mut self, section: WADSection) -> Result<Vec<u8>, WADError> {
        let data = read_section_bytes(&mut self.reader, self.header.section_offset(section), self.header.section_size(section))?;
        Ok(data)
    }

    /// Closes the WAD, releasing the reader along with everything parsed from it.
    pub fn close(self) {}
}
