// title/mod.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Root for all title-related modules and the stable error code table shared by all of them.

pub mod cert;
pub mod commonkeys;
pub mod content;
pub mod crypto;
pub mod ticket;
pub mod tmd;
pub mod util;
pub mod wad;

#[cfg(test)]
pub(crate) mod testutil;

use std::fmt;

/// Stable, machine-readable codes for every failure the library can report. Each module's error
/// type maps onto one of these through its `code()` method.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    OpenFailed = 1,
    BadMagic = 2,
    BadTicket = 3,
    BadTmd = 4,
    IoError = 5,
    DecryptionFailed = 6,
    BadAlloc = 7,
    OutOfRange = 8,
    HashMismatch = 9,
    BadCertchain = 10,
    Unknown = 0xFF,
}

impl ErrorCode {
    /// Maps a raw numeric code back to an ErrorCode. Values with no assigned meaning map to
    /// ErrorCode::Unknown rather than failing.
    pub fn from_u32(code: u32) -> ErrorCode {
        match code {
            1 => ErrorCode::OpenFailed,
            2 => ErrorCode::BadMagic,
            3 => ErrorCode::BadTicket,
            4 => ErrorCode::BadTmd,
            5 => ErrorCode::IoError,
            6 => ErrorCode::DecryptionFailed,
            7 => ErrorCode::BadAlloc,
            8 => ErrorCode::OutOfRange,
            9 => ErrorCode::HashMismatch,
            10 => ErrorCode::BadCertchain,
            _ => ErrorCode::Unknown,
        }
    }

    /// Gets the numeric value of the code.
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    /// Gets the fixed human-readable sentence describing the code.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::OpenFailed => "Failed to open wad",
            ErrorCode::BadMagic => "Bad magic - file might not be in wad format",
            ErrorCode::BadTicket => "Failed to parse ticket",
            ErrorCode::BadTmd => "Failed to parse title metadata",
            ErrorCode::IoError => "I/O Error",
            ErrorCode::DecryptionFailed => "Decryption failed",
            ErrorCode::BadAlloc => "Failed to allocate memory",
            ErrorCode::OutOfRange => "Index out of range",
            ErrorCode::HashMismatch => "Hashes do not match",
            ErrorCode::BadCertchain => "Bad certchain",
            ErrorCode::Unknown => "Unknown error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for raw in 1..=10 {
            assert_eq!(ErrorCode::from_u32(raw).as_u32(), raw);
        }
    }

    #[test]
    fn test_unmapped_code() {
        assert_eq!(ErrorCode::from_u32(0), ErrorCode::Unknown);
        assert_eq!(ErrorCode::from_u32(4242), ErrorCode::Unknown);
        assert_eq!(ErrorCode::from_u32(4242).message(), "Unknown error");
    }

    #[test]
    fn test_messages() {
        assert_eq!(ErrorCode::HashMismatch.message(), "Hashes do not match");
        assert_eq!(ErrorCode::BadCertchain.to_string(), "Bad certchain");
    }
}
