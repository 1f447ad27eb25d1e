// title/util.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Alignment arithmetic shared by the WAD, certificate, and content code, plus Title ID display.

/// Rounds an offset or length up to the next multiple of the given alignment.
pub fn align(offset: u64, alignment: u64) -> u64 {
    if offset % alignment == 0 {
        offset
    } else {
        offset + alignment - (offset % alignment)
    }
}

/// Rounds up to the next 64-byte boundary, which every WAD section and certificate starts on.
pub fn align64(offset: u64) -> u64 {
    align(offset, 64)
}

/// Rounds up to the next 16-byte boundary (one AES block).
pub fn align16(offset: u64) -> u64 {
    align(offset, 16)
}

fn nibble_to_hex(nibble: u8) -> char {
    let nibble = nibble & 0x0F;
    if nibble <= 9 {
        (b'0' + nibble) as char
    } else {
        (b'A' + nibble - 10) as char
    }
}

/// Converts a Title ID into the short string used to name extracted files. Each of the low four
/// bytes is kept as a letter when it is alphabetic and written as hex otherwise, then the low
/// nibbles of the two bytes below the title type are appended.
pub fn title_id_to_string(title_id: u64) -> String {
    let bytes = title_id.to_be_bytes();
    let mut out = String::with_capacity(12);
    for &byte in &bytes[4..] {
        if byte.is_ascii_alphabetic() {
            out.push(byte as char);
        } else {
            out.push(nibble_to_hex(byte >> 4));
            out.push(nibble_to_hex(byte));
        }
    }
    out.push(nibble_to_hex(bytes[2]));
    out.push(nibble_to_hex(bytes[3]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align() {
        assert_eq!(align64(0), 0);
        assert_eq!(align64(1), 64);
        assert_eq!(align64(64), 64);
        assert_eq!(align64(0x20), 0x40);
        assert_eq!(align16(100), 112);
        assert_eq!(align16(200), 208);
        assert_eq!(align16(16), 16);
        assert_eq!(align(5, 4), 8);
    }

    #[test]
    fn test_title_id_channel() {
        assert_eq!(title_id_to_string(0x0001000148414241), "HABA01");
    }

    #[test]
    fn test_title_id_system() {
        assert_eq!(title_id_to_string(0x0000000100000002), "0000000201");
    }

    #[test]
    fn test_title_id_mixed() {
        // 0x41 is 'A', 0x31 is '1' (not alphabetic, so it is written as hex).
        assert_eq!(title_id_to_string(0x0001000541314243), "A31BC05");
    }
}
