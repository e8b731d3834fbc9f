//! CRC-8 used by the SHT3x to protect each 16-bit word it sends.
//!
//! The generator polynomial is 0x31 (x^8 + x^5 + x^4 + 1) with no reflection
//! and no final XOR. The sensor initialises the remainder to 0xFF, see
//! section 4.12 of the [datasheet].
//!
//! [`crc8`] is the reference bit-serial definition. [`crc8_table`] produces
//! identical results from a lookup table built at compile time.
//!
//! [datasheet]: https://sensirion.com/media/documents/213E6A3B/63A5A569/Datasheet_SHT3x_DIS.pdf

pub const POLYNOMIAL: u8 = 0x31;

/// Initial remainder used by the SHT3x for every data word.
pub const SHT3X_INITIAL: u8 = 0xFF;

const fn top_bit_set(b: u8) -> bool {
    b & 0x80 == 0x80
}

/// Calculate the CRC8 of `bytes`, starting from the remainder `initial`.
///
/// Running this over two data bytes and their trailing CRC byte gives 0
/// when the CRC byte is correct.
///
/// ```
/// use sht3x_tsl2561::crc::crc8;
/// // Example taken from the datasheet.
/// assert_eq!(crc8(&[0xBE, 0xEF], 0xFF), 0x92);
/// ```
#[must_use]
pub fn crc8(bytes: &[u8], initial: u8) -> u8 {
    let mut crc: u8 = initial;
    for byte in bytes {
        crc ^= byte; // "XOR-in" the next byte.
        for _ in 0..8 {
            if top_bit_set(crc) {
                // The x^8 term is implicit, so test the top bit before the
                // shift pushes it out, then apply the polynomial.
                crc <<= 1;
                crc ^= POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}

/// Check a two-byte word against the checksum the sensor sent with it.
#[must_use]
pub fn check(data: [u8; 2], checksum: u8, initial: u8) -> bool {
    crc8(&data, initial) == checksum
}

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u8;
        let mut bit = 0;
        while bit < 8 {
            crc = if top_bit_set(crc) {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static TABLE: [u8; 256] = build_table();

/// Table-driven equivalent of [`crc8`].
#[must_use]
pub fn crc8_table(bytes: &[u8], initial: u8) -> u8 {
    bytes
        .iter()
        .fold(initial, |crc, byte| TABLE[usize::from(crc ^ byte)])
}
