// title/crypto.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Implements the crypto functions required to decrypt Title Keys and Wii content.

use aes::cipher::{BlockDecryptMut, KeyIvInit};
use aes::cipher::block_padding::NoPadding;
use thiserror::Error;
use crate::title::commonkeys::CommonKey;

type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

#[derive(Debug, Error)]
#[error("AES-CBC decryption failed (input was {0} bytes, which is not a whole number of blocks)")]
pub struct DecryptionError(pub usize);

// Convert a Title ID into the format required for use as the Title Key decryption IV.
fn title_id_to_iv(title_id: [u8; 8]) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[..8].copy_from_slice(&title_id);
    iv
}

// Convert a content index into the format required for use as the content decryption IV.
fn content_index_to_iv(index: u16) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[..2].copy_from_slice(&index.to_be_bytes());
    iv
}

/// Decrypts a Title Key using the specified common key and the corresponding Title ID.
pub fn decrypt_title_key(title_key_enc: [u8; 16], common_key: CommonKey, title_id: [u8; 8]) -> Result<[u8; 16], DecryptionError> {
    let iv = title_id_to_iv(title_id);
    let decryptor = Aes128CbcDec::new(&common_key.key().into(), &iv.into());
    let mut title_key = title_key_enc;
    decryptor.decrypt_padded_mut::<NoPadding>(&mut title_key).map_err(|_| DecryptionError(16))?;
    Ok(title_key)
}

/// Decrypts content in place using the corresponding Title Key and content index. The buffer must
/// already be padded out to a multiple of 16 bytes.
pub fn decrypt_content(buf: &mut [u8], title_key: [u8; 16], index: u16) -> Result<(), DecryptionError> {
    let iv = content_index_to_iv(index);
    let len = buf.len();
    let decryptor = Aes128CbcDec::new(&title_key.into(), &iv.into());
    decryptor.decrypt_padded_mut::<NoPadding>(buf).map_err(|_| DecryptionError(len))?;
    Ok(())
}
