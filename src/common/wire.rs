// src/common/wire.rs

//! Byte layouts exchanged with the external transport.
//!
//! Data record (16 bytes):
//!
//! | offset | size | content                                  |
//! |--------|------|------------------------------------------|
//! | 0      | 1    | module id                                |
//! | 1      | 1    | message type ([`MessageType::Data`])     |
//! | 2      | 2    | temperature, 0.1 °C, big-endian `i16`    |
//! | 4      | 2    | humidity, 0.1 %RH, big-endian `i16`      |
//! | 6      | 2    | pressure, mbar, big-endian `i16`         |
//! | 8      | 8    | reserved, zero                           |
//!
//! A measurement field equal to `0x7FFF` means the quantity was absent in that cycle.
//!
//! Reply (2 bytes): module id, then [`ReplyStatus`].

use arrayvec::ArrayVec;

use super::types::Measurement;

/// Fixed length of a data record, as expected by the transport.
pub const WIRE_RECORD_LEN: usize = 16;

/// Number of meaningful bytes at the start of a data record.
pub const WIRE_PAYLOAD_LEN: usize = 8;

/// Fixed length of a synchronous reply.
pub const REPLY_LEN: usize = 2;

/// Module identifier used when none is configured.
pub const METEO_MODULE_ID: u8 = 13;

/// Message type tags shared by records, commands and replies.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MessageType {
    Data = 0x00,
    SetPeriod = 0x01,
    Poll = 0x02,
    Fail = 0xFF,
}

impl MessageType {
    /// Tries to convert a raw tag into a `MessageType`.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(MessageType::Data),
            0x01 => Some(MessageType::SetPeriod),
            0x02 => Some(MessageType::Poll),
            0xFF => Some(MessageType::Fail),
            _ => None,
        }
    }
}

/// Error decoding a data record.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireError {
    #[error("Invalid record length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("Unexpected message type {0:#04x}")]
    UnexpectedTag(u8),
}

// --- Data Record ---

/// One encoded data record, built once per publish cycle and moved to the publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRecord {
    bytes: ArrayVec<u8, WIRE_RECORD_LEN>,
}

impl WireRecord {
    /// Lays out `measurement` as a data record for module `module_id`.
    ///
    /// All three fields are always written, absent ones as the sentinel.
    pub fn encode(module_id: u8, measurement: &Measurement) -> Self {
        let [t_hi, t_lo] = measurement.temperature_decidegrees.to_be_bytes();
        let [h_hi, h_lo] = measurement.humidity_decipercent.to_be_bytes();
        let [p_hi, p_lo] = measurement.pressure_mbar.to_be_bytes();
        let payload: [u8; WIRE_PAYLOAD_LEN] =
            [module_id, MessageType::Data as u8, t_hi, t_lo, h_hi, h_lo, p_hi, p_lo];

        // Everything past the payload stays zero.
        let mut bytes = ArrayVec::from([0u8; WIRE_RECORD_LEN]);
        bytes[..WIRE_PAYLOAD_LEN].copy_from_slice(&payload);
        Self { bytes }
    }

    /// Validates a received data record.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, WireError> {
        if raw.len() != WIRE_RECORD_LEN {
            return Err(WireError::InvalidLength {
                expected: WIRE_RECORD_LEN,
                got: raw.len(),
            });
        }
        let bytes: ArrayVec<u8, WIRE_RECORD_LEN> = raw.iter().copied().collect();
        if bytes[1] != MessageType::Data as u8 {
            return Err(WireError::UnexpectedTag(bytes[1]));
        }
        Ok(Self { bytes })
    }

    pub fn module_id(&self) -> u8 {
        self.bytes[0]
    }

    /// Recovers the measurement triple, sentinels included.
    pub fn measurement(&self) -> Measurement {
        let field = |offset: usize| i16::from_be_bytes([self.bytes[offset], self.bytes[offset + 1]]);
        Measurement {
            temperature_decidegrees: field(2),
            humidity_decipercent: field(4),
            pressure_mbar: field(6),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

// --- Replies ---

/// Status byte of a synchronous reply.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ReplyStatus {
    /// Command applied; echoes the `SET_PERIOD` tag.
    Ok = MessageType::SetPeriod as u8,
    Fail = MessageType::Fail as u8,
}

/// A synchronous reply to a command.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reply {
    pub module_id: u8,
    pub status: ReplyStatus,
}

impl Reply {
    pub const fn ok(module_id: u8) -> Self {
        Self { module_id, status: ReplyStatus::Ok }
    }

    pub const fn fail(module_id: u8) -> Self {
        Self { module_id, status: ReplyStatus::Fail }
    }

    pub const fn to_bytes(self) -> [u8; REPLY_LEN] {
        [self.module_id, self.status as u8]
    }
}
