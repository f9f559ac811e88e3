use crc::{Algorithm, Crc};

/// CRC-8 used by the SHT3x on every transferred word.
///
/// Polynomial 0x31 (x^8 + x^5 + x^4 + 1), init 0xFF, MSB first, no final XOR.
pub const SHT3X_CRC: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xF7,
    residue: 0x00,
};

const CRC_COMPUTER: Crc<u8> = Crc::<u8>::new(&SHT3X_CRC);

/// Size of a word group on the wire: two data bytes and one CRC byte.
pub const WORD_LEN: usize = 3;

/// Computes the CRC byte for the given data bytes.
#[inline]
pub fn crc8(data: &[u8]) -> u8 {
    CRC_COMPUTER.checksum(data)
}

/// Checks one `[msb, lsb, crc]` group and returns the word it carries.
///
/// Returns `None` when the group is not exactly three bytes long or the CRC
/// does not match.
pub fn verify_word(group: &[u8]) -> Option<u16> {
    match group {
        [msb, lsb, crc] if crc8(&[*msb, *lsb]) == *crc => Some(u16::from_be_bytes([*msb, *lsb])),
        _ => None,
    }
}

/// Serializes a word followed by its CRC byte.
pub fn encode_word(word: u16) -> [u8; WORD_LEN] {
    let [msb, lsb] = word.to_be_bytes();
    [msb, lsb, crc8(&[msb, lsb])]
}
