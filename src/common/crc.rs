// src/common/crc.rs

use crc::{Crc, CRC_8_SMBUS};

// Shared instance for checksumming persisted configuration blobs.
const CRC_COMPUTER: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// Calculates the CRC-8/SMBUS checksum (poly 0x07, init 0x00) over `data`.
///
/// Guards the persisted configuration blob against torn or stale NVRAM contents.
#[inline]
pub fn calculate_crc8(data: &[u8]) -> u8 {
    CRC_COMPUTER.checksum(data)
}
