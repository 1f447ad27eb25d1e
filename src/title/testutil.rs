// title/testutil.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Builds synthetic certificate chains, Tickets, TMDs, encrypted content, and WAD images for tests.

use std::io::Write;
use aes::cipher::{BlockEncryptMut, KeyIvInit};
use aes::cipher::block_padding::NoPadding;
use byteorder::{BigEndian, WriteBytesExt};
use sha1::{Digest, Sha1};
use crate::title::commonkeys::CommonKey;
use crate::title::util::{align16, align64};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

pub const TITLE_ID: u64 = 0x0001000148414241;
pub const TITLE_KEY: [u8; 16] = [
    0x5a, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xf0,
];
pub const RETAIL_ISSUER: &str = "Root-CA00000001-XS00000003";

/// Encrypts data with AES-128-CBC, zero-padding it to a whole number of blocks first.
pub fn encrypt(data: &[u8], key: [u8; 16], iv: [u8; 16]) -> Vec<u8> {
    let mut buf = data.to_vec();
    buf.resize(align16(data.len() as u64) as usize, 0);
    let len = buf.len();
    Aes128CbcEnc::new(&key.into(), &iv.into())
        .encrypt_padded_mut::<NoPadding>(&mut buf, len)
        .unwrap();
    buf
}

fn fixed_name(name: &str) -> [u8; 64] {
    let mut out = [0u8; 64];
    out[..name.len()].copy_from_slice(name.as_bytes());
    out
}

/// Builds one certificate record, padded out to the next 64-byte boundary.
pub fn cert_record(signature_type: u32, key_type: u32, issuer: &str, child: &str) -> Vec<u8> {
    let signature_len = crate::title::cert::signature_length(signature_type);
    let key_len = crate::title::cert::public_key_length(key_type);
    let mut buf = Vec::new();
    buf.write_u32::<BigEndian>(signature_type).unwrap();
    buf.write_all(&vec![0xA5; signature_len]).unwrap();
    buf.write_all(&[0u8; 0x3c]).unwrap();
    buf.write_all(&fixed_name(issuer)).unwrap();
    buf.write_u32::<BigEndian>(key_type).unwrap();
    buf.write_all(&fixed_name(child)).unwrap();
    buf.write_all(&vec![0x5A; key_len]).unwrap();
    buf.resize(align64(buf.len() as u64) as usize, 0);
    buf
}

/// A retail CA/CP/XS certificate chain.
pub fn cert_chain() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend(cert_record(0x10000, 1, "Root", "CA00000001"));
    buf.extend(cert_record(0x10001, 1, "Root-CA00000001", "CP00000004"));
    buf.extend(cert_record(0x10001, 1, "Root-CA00000001", "XS00000003"));
    buf
}

/// Builds a v0 Ticket whose Title Key is encrypted with the given common key.
pub fn ticket(issuer: &str, title_id: u64, title_key: [u8; 16], key_type: u8, common_key: CommonKey) -> Vec<u8> {
    let mut iv = [0u8; 16];
    iv[..8].copy_from_slice(&title_id.to_be_bytes());
    let title_key_enc = encrypt(&title_key, common_key.key(), iv);
    let mut buf = vec![0u8; 0x2A4];
    buf[..4].copy_from_slice(&0x10001u32.to_be_bytes());
    buf[0x140..0x180].copy_from_slice(&fixed_name(issuer));
    buf[0x1BF..0x1CF].copy_from_slice(&title_key_enc);
    buf[0x1D0..0x1D8].copy_from_slice(&0x0123456789ABCDEFu64.to_be_bytes());
    buf[0x1D8..0x1DC].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    buf[0x1DC..0x1E4].copy_from_slice(&title_id.to_be_bytes());
    buf[0x1E6..0x1E8].copy_from_slice(&513u16.to_be_bytes());
    buf[0x1F1] = key_type;
    buf
}

/// One content as it will be described in a TMD.
pub struct TestContent {
    pub content_id: u32,
    pub index: u16,
    pub content_type: u16,
    pub data: Vec<u8>,
}

impl TestContent {
    pub fn new(content_id: u32, index: u16, data: Vec<u8>) -> Self {
        TestContent { content_id, index, content_type: 1, data }
    }
}

/// Builds a TMD describing the provided contents, hashing each one.
pub fn tmd(title_id: u64, title_type: u32, region: u16, contents: &[TestContent]) -> Vec<u8> {
    let mut buf = vec![0u8; 0x1E4];
    buf[..4].copy_from_slice(&0x10001u32.to_be_bytes());
    buf[0x140..0x180].copy_from_slice(&fixed_name("Root-CA00000001-CP00000004"));
    buf[0x184..0x18C].copy_from_slice(&0x000000010000003Au64.to_be_bytes());
    buf[0x18C..0x194].copy_from_slice(&title_id.to_be_bytes());
    buf[0x194..0x198].copy_from_slice(&title_type.to_be_bytes());
    buf[0x198..0x19A].copy_from_slice(&0x3031u16.to_be_bytes());
    buf[0x19C..0x19E].copy_from_slice(&region.to_be_bytes());
    buf[0x1DC..0x1DE].copy_from_slice(&514u16.to_be_bytes());
    buf[0x1DE..0x1E0].copy_from_slice(&(contents.len() as u16).to_be_bytes());
    buf[0x1E0..0x1E2].copy_from_slice(&1u16.to_be_bytes());
    for content in contents {
        buf.write_u32::<BigEndian>(content.content_id).unwrap();
        buf.write_u16::<BigEndian>(content.index).unwrap();
        buf.write_u16::<BigEndian>(content.content_type).unwrap();
        buf.write_u64::<BigEndian>(content.data.len() as u64).unwrap();
        let mut hasher = Sha1::new();
        hasher.update(&content.data);
        buf.write_all(&hasher.finalize()).unwrap();
    }
    buf
}

/// Encrypts every content and packs them one after another, each padded to 16 bytes.
pub fn data_section(contents: &[TestContent], title_key: [u8; 16]) -> Vec<u8> {
    let mut buf = Vec::new();
    for content in contents {
        let mut iv = [0u8; 16];
        iv[..2].copy_from_slice(&content.index.to_be_bytes());
        buf.extend(encrypt(&content.data, title_key, iv));
    }
    buf
}

/// Lays out a complete WAD image from its sections.
pub fn wad(cert_chain: &[u8], ticket: &[u8], tmd: &[u8], data: &[u8], footer: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_u32::<BigEndian>(0x20).unwrap();
    buf.write_all(b"Is\0\0").unwrap();
    buf.write_u32::<BigEndian>(cert_chain.len() as u32).unwrap();
    buf.write_u32::<BigEndian>(0).unwrap();
    buf.write_u32::<BigEndian>(ticket.len() as u32).unwrap();
    buf.write_u32::<BigEndian>(tmd.len() as u32).unwrap();
    buf.write_u32::<BigEndian>(data.len() as u32).unwrap();
    buf.write_u32::<BigEndian>(footer.len() as u32).unwrap();
    for section in [cert_chain, ticket, tmd, data, footer] {
        buf.resize(align64(buf.len() as u64) as usize, 0);
        buf.write_all(section).unwrap();
    }
    buf.resize(align64(buf.len() as u64) as usize, 0);
    buf
}

/// The contents used by the sample title: sizes 100, 200, and 16 bytes.
pub fn sample_contents() -> Vec<TestContent> {
    vec![
        TestContent::new(0x00000010, 0, (0..100u32).map(|x| x as u8).collect()),
        TestContent::new(0x00000011, 1, (0..200u32).map(|x| (x * 3) as u8).collect()),
        TestContent::new(0x00000012, 2, vec![0xC3; 16]),
    ]
}

/// Two contents whose record indices (5 and 9) differ from their positions in the content table.
pub fn reindexed_contents() -> Vec<TestContent> {
    vec![
        TestContent::new(0x00000020, 5, (0..48u32).map(|x| (x * 7) as u8).collect()),
        TestContent::new(0x00000021, 9, (0..40u32).map(|x| (x + 0x40) as u8).collect()),
    ]
}

/// A complete retail channel WAD with three contents and a short footer.
pub fn sample_wad() -> Vec<u8> {
    let contents = sample_contents();
    wad(
        &cert_chain(),
        &ticket(RETAIL_ISSUER, TITLE_ID, TITLE_KEY, 0, CommonKey::Normal),
        &tmd(TITLE_ID, 0x00010001, 1, &contents),
        &data_section(&contents, TITLE_KEY),
        b"footer data",
    )
}
