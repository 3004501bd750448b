//! Slot hashing (C1): maps a key to one of the cluster's 16384 hash slots.
//!
//! Uses CRC16 with the XMODEM polynomial (0x1021), restricted to the portion
//! of the key inside a `{hashtag}` when one is present, matching the
//! convention used by sharded key-value clusters so that tagged keys always
//! land on the same slot.

/// Total number of hash slots in the cluster.
pub const SLOT_COUNT: u16 = 16384;

static CRC16_TABLE: [u16; 256] = {
    let mut table = [0u16; 256];
    let mut i = 0u16;
    while i < 256 {
        let mut crc = i << 8;
        let mut j = 0;
        while j < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
            j += 1;
        }
        table[i as usize] = crc;
        i += 1;
    }
    table
};

/// CRC16-XMODEM checksum of `data`.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        let idx = ((crc >> 8) ^ (byte as u16)) as usize;
        crc = (crc << 8) ^ CRC16_TABLE[idx];
    }
    crc
}

/// Extracts the hashtag from `key`, if one is present.
///
/// A hashtag is the content between the first `{` and the next `}` in the
/// key, provided there is at least one byte between them. When no such pair
/// exists, the whole key hashes.
pub fn extract_hash_tag(key: &[u8]) -> &[u8] {
    let Some(open) = key.iter().position(|&b| b == b'{') else {
        return key;
    };
    match key[open + 1..].iter().position(|&b| b == b'}') {
        Some(0) | None => key,
        Some(close_offset) => &key[open + 1..open + 1 + close_offset],
    }
}

/// Computes the slot a key belongs to.
pub fn hash_slot(key: &[u8]) -> u16 {
    crc16(extract_hash_tag(key)) % SLOT_COUNT
}
