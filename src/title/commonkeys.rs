// title/commonkeys.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Provides the common keys used to decrypt Title Keys, and the rules for picking one of them.

const COMMON_KEY: [u8; 16] = [
    0xeb, 0xe4, 0x2a, 0x22, 0x5e, 0x85, 0x93, 0xe4, 0x48, 0xd9, 0xc5, 0x45, 0x73, 0x81, 0xaa, 0xf7,
];
const KOREAN_KEY: [u8; 16] = [
    0x63, 0xb8, 0x2b, 0xb4, 0xf4, 0x61, 0x4e, 0x2e, 0x13, 0xf2, 0xfe, 0xfb, 0xba, 0x4c, 0x9b, 0x7e,
];
const DEV_COMMON_KEY: [u8; 16] = [
    0xa1, 0x60, 0x4a, 0x6a, 0x71, 0x23, 0xb5, 0x29, 0xae, 0x8b, 0xec, 0x32, 0xc8, 0x16, 0xfc, 0xaa,
];
const VWII_KEY: [u8; 16] = [
    0x30, 0xbf, 0xc7, 0x6e, 0x7c, 0x19, 0xaf, 0xbb, 0x23, 0x16, 0x33, 0x30, 0xce, 0xd7, 0xc2, 0x8d,
];

/// The issuer of Tickets signed for development consoles. Tickets from this issuer always use the
/// development common key.
pub const DEBUG_TICKET_ISSUER: &str = "Root-CA00000002-XS00000006";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommonKey {
    Normal,
    Korean,
    Debug,
    Vwii,
}

impl CommonKey {
    /// Gets the raw bytes of the common key.
    pub fn key(&self) -> [u8; 16] {
        match self {
            CommonKey::Normal => COMMON_KEY,
            CommonKey::Korean => KOREAN_KEY,
            CommonKey::Debug => DEV_COMMON_KEY,
            CommonKey::Vwii => VWII_KEY,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CommonKey::Normal => "Common (Retail)",
            CommonKey::Korean => "Korean",
            CommonKey::Debug => "Common (Development)",
            CommonKey::Vwii => "vWii",
        }
    }

    /// Picks the common key for a Ticket from its key type byte and signature issuer. A Ticket
    /// issued by the development CA always gets the development key. Otherwise only the Korean
    /// key can be selected explicitly; every other key type, including the vWii slot (2), falls
    /// back on the retail common key.
    pub fn select(key_type: u8, issuer: &[u8; 64]) -> CommonKey {
        if issuer_matches(issuer, DEBUG_TICKET_ISSUER) {
            log::debug!("ticket issued by {DEBUG_TICKET_ISSUER}, using the development common key");
            return CommonKey::Debug;
        }
        match key_type {
            0 => CommonKey::Normal,
            1 => CommonKey::Korean,
            2 => {
                log::warn!("ticket selects the vWii common key slot, using the retail common key instead");
                CommonKey::Normal
            },
            _ => {
                log::warn!("ticket has unknown common key type {key_type}, using the retail common key");
                CommonKey::Normal
            }
        }
    }
}

// Compares a fixed-width, NUL-padded issuer field against an identifier. Bytes after the first
// NUL are not part of the identifier.
fn issuer_matches(issuer: &[u8; 64], expected: &str) -> bool {
    let end = issuer.iter().position(|&b| b == 0).unwrap_or(issuer.len());
    &issuer[..end] == expected.as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(name: &str) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..name.len()].copy_from_slice(name.as_bytes());
        out
    }

    #[test]
    fn test_get_common_key() {
        assert_eq!(CommonKey::Normal.key(), [0xeb, 0xe4, 0x2a, 0x22, 0x5e, 0x85, 0x93, 0xe4, 0x48, 0xd9, 0xc5, 0x45, 0x73, 0x81, 0xaa, 0xf7]);
    }

    #[test]
    fn test_get_korean_key() {
        assert_eq!(CommonKey::Korean.key(), [0x63, 0xb8, 0x2b, 0xb4, 0xf4, 0x61, 0x4e, 0x2e, 0x13, 0xf2, 0xfe, 0xfb, 0xba, 0x4c, 0x9b, 0x7e]);
    }

    #[test]
    fn test_get_vwii_key() {
        assert_eq!(CommonKey::Vwii.key(), [0x30, 0xbf, 0xc7, 0x6e, 0x7c, 0x19, 0xaf, 0xbb, 0x23, 0x16, 0x33, 0x30, 0xce, 0xd7, 0xc2, 0x8d]);
    }

    #[test]
    fn test_get_dev_key() {
        assert_eq!(CommonKey::Debug.key(), [0xa1, 0x60, 0x4a, 0x6a, 0x71, 0x23, 0xb5, 0x29, 0xae, 0x8b, 0xec, 0x32, 0xc8, 0x16, 0xfc, 0xaa]);
    }

    #[test]
    fn test_select_retail() {
        let retail = issuer("Root-CA00000001-XS00000003");
        assert_eq!(CommonKey::select(0, &retail), CommonKey::Normal);
        assert_eq!(CommonKey::select(1, &retail), CommonKey::Korean);
    }

    #[test]
    fn test_select_vwii_falls_back() {
        let retail = issuer("Root-CA00000001-XS00000003");
        assert_eq!(CommonKey::select(2, &retail), CommonKey::Normal);
    }

    #[test]
    fn test_select_invalid_index() {
        let retail = issuer("Root-CA00000001-XS00000003");
        assert_eq!(CommonKey::select(57, &retail), CommonKey::Normal);
    }

    #[test]
    fn test_select_debug_overrides_key_type() {
        let dev = issuer(DEBUG_TICKET_ISSUER);
        for key_type in [0, 1, 2, 200] {
            assert_eq!(CommonKey::select(key_type, &dev), CommonKey::Debug);
        }
    }

    #[test]
    fn test_select_debug_requires_exact_issuer() {
        // The other development XS certificate does not trigger the override.
        let dev4 = issuer("Root-CA00000002-XS00000004");
        assert_eq!(CommonKey::select(0, &dev4), CommonKey::Normal);
        let longer = issuer("Root-CA00000002-XS000000061");
        assert_eq!(CommonKey::select(0, &longer), CommonKey::Normal);
    }
}
