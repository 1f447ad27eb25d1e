// title/cert.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Implements the structures and methods required for parsing Wii certificate chains. Signatures
// are read but never verified.

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use byteorder::{BigEndian, ReadBytesExt};
use thiserror::Error;
use crate::title::ErrorCode;
use crate::title::util::align64;

#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("certificate appears to be signed with invalid signature type `{0:#x}`")]
    InvalidSignatureType(u32),
    #[error("certificate appears to contain key with invalid type `{0}`")]
    InvalidKeyType(u32),
    #[error("requested certificate {index} is out of range (chain contains {count})")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("certificate chain file could not be opened")]
    Open(#[source] std::io::Error),
    #[error("certificate data is not in a valid format")]
    IO(#[from] std::io::Error),
}

impl CertificateError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CertificateError::InvalidSignatureType(_) | CertificateError::InvalidKeyType(_) => ErrorCode::BadCertchain,
            CertificateError::IndexOutOfRange { .. } => ErrorCode::OutOfRange,
            CertificateError::Open(_) => ErrorCode::OpenFailed,
            CertificateError::IO(_) => ErrorCode::IoError,
        }
    }
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureType {
    Rsa4096 = 0x00010000,
    Rsa2048 = 0x00010001,
    ECC = 0x00010002,
}

impl SignatureType {
    pub fn from_u32(value: u32) -> Option<SignatureType> {
        match value {
            0x00010000 => Some(SignatureType::Rsa4096),
            0x00010001 => Some(SignatureType::Rsa2048),
            0x00010002 => Some(SignatureType::ECC),
            _ => None,
        }
    }

    /// Gets the length of a signature of this type, in bytes.
    pub fn length(&self) -> usize {
        match self {
            SignatureType::Rsa4096 => 0x200,
            SignatureType::Rsa2048 => 0x100,
            SignatureType::ECC => 0x40,
        }
    }
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Rsa4096 = 0x00000000,
    Rsa2048 = 0x00000001,
    EccB233 = 0x00000002,
}

impl KeyType {
    pub fn from_u32(value: u32) -> Option<KeyType> {
        match value {
            0x00000000 => Some(KeyType::Rsa4096),
            0x00000001 => Some(KeyType::Rsa2048),
            0x00000002 => Some(KeyType::EccB233),
            _ => None,
        }
    }

    /// Gets the length of a public key of this type as stored in a certificate, in bytes.
    pub fn length(&self) -> usize {
        match self {
            // Modulus, exponent, then padding.
            KeyType::Rsa4096 => 0x200 + 0x4 + 0x38,
            KeyType::Rsa2048 => 0x100 + 0x4 + 0x38,
            KeyType::EccB233 => 60 + 60,
        }
    }
}

/// Gets the signature length for a raw signature type code, or 0 if the code is unknown.
pub fn signature_length(signature_type: u32) -> usize {
    SignatureType::from_u32(signature_type).map_or(0, |t| t.length())
}

/// Gets the public key length for a raw key type code, or 0 if the code is unknown.
pub fn public_key_length(key_type: u32) -> usize {
    KeyType::from_u32(key_type).map_or(0, |t| t.length())
}

/// A structure that represents the components of a Wii signing certificate.
#[derive(Debug, Clone)]
pub struct Certificate {
    signature_type: SignatureType,
    signature: Vec<u8>,
    issuer: [u8; 64],
    key_type: KeyType,
    child_cert: [u8; 64],
    public_key: Vec<u8>,
}

impl Certificate {
    /// Reads one certificate from the current position of the reader. The reader is left at the
    /// end of the certificate's data, before any alignment padding.
    fn read<R: Read + Seek>(buf: &mut R) -> Result<Certificate, CertificateError> {
        let signature_type_int = buf.read_u32::<BigEndian>()?;
        let signature_type = SignatureType::from_u32(signature_type_int)
            .ok_or(CertificateError::InvalidSignatureType(signature_type_int))?;
        let mut signature = vec![0u8; signature_type.length()];
        buf.read_exact(&mut signature)?;
        // Skip past padding at the end of the signature.
        buf.seek(SeekFrom::Current(0x3c))?;
        let mut issuer = [0u8; 64];
        buf.read_exact(&mut issuer)?;
        let key_type_int = buf.read_u32::<BigEndian>()?;
        let key_type = KeyType::from_u32(key_type_int)
            .ok_or(CertificateError::InvalidKeyType(key_type_int))?;
        let mut child_cert = [0u8; 64];
        buf.read_exact(&mut child_cert)?;
        let mut public_key = vec![0u8; key_type.length()];
        buf.read_exact(&mut public_key)?;
        Ok(Certificate {
            signature_type,
            signature,
            issuer,
            key_type,
            child_cert,
            public_key,
        })
    }

    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Gets the name of the certificate used to sign a certificate as a string.
    pub fn issuer(&self) -> String {
        String::from_utf8_lossy(&self.issuer).trim_end_matches('\0').to_owned()
    }

    /// Gets the raw, fixed-width issuer field. It is not guaranteed to contain a NUL.
    pub fn issuer_bytes(&self) -> &[u8; 64] {
        &self.issuer
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Gets the name of a certificate's child certificate as a string.
    pub fn child_cert(&self) -> String {
        String::from_utf8_lossy(&self.child_cert).trim_end_matches('\0').to_owned()
    }

    pub fn child_cert_bytes(&self) -> &[u8; 64] {
        &self.child_cert
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Gets the number of bytes the certificate occupies on disk, before alignment.
    pub fn record_size(&self) -> usize {
        4 + self.signature.len() + 0x3c + 64 + 4 + 64 + self.public_key.len()
    }
}

/// A structure that represents an ordered chain of certificates, in the order they were stored.
#[derive(Debug, Clone, Default)]
pub struct CertificateChain {
    certs: Vec<Certificate>,
}

impl CertificateChain {
    /// Creates a new CertificateChain instance from the binary data of an entire certificate chain.
    /// Certificates are read until the end of the data is reached, with each one starting on a
    /// 64-byte boundary. Empty data produces an empty chain.
    pub fn from_bytes(data: &[u8]) -> Result<CertificateChain, CertificateError> {
        let end = data.len() as u64;
        let mut buf = Cursor::new(data);
        let mut certs = Vec::new();
        while buf.position() < end {
            let cert = Certificate::read(&mut buf)?;
            certs.push(cert);
            let next = align64(buf.position());
            buf.seek(SeekFrom::Start(next))?;
        }
        log::debug!("parsed certificate chain with {} certificates", certs.len());
        Ok(CertificateChain { certs })
    }

    /// Opens and parses a standalone certificate chain file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<CertificateChain, CertificateError> {
        let mut file = File::open(path).map_err(CertificateError::Open)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        CertificateChain::from_bytes(&data)
    }

    pub fn cert_count(&self) -> usize {
        self.certs.len()
    }

    /// Gets the certificate at the specified position in the chain.
    pub fn cert(&self, index: usize) -> Result<&Certificate, CertificateError> {
        self.certs.get(index).ok_or(CertificateError::IndexOutOfRange { index, count: self.certs.len() })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Certificate> {
        self.certs.iter()
    }
}
