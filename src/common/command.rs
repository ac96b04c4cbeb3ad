// src/common/command.rs

//! Inbound binary commands.
//!
//! Byte 0 is the command tag, followed by the command's payload:
//!
//! * `SET_PERIOD` (`0x01`): one byte, the new publish period in minutes.
//! * `POLL` (`0x02`): no payload.

use super::wire::MessageType;

/// Total length of a `SET_PERIOD` command (tag + period byte).
pub const SET_PERIOD_LEN: usize = 2;

/// A decoded remote command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Change the publish period; 0 stops periodic publishing.
    SetPeriod { minutes: u8 },
    /// Publish a measurement now, flagged as an acknowledgement.
    Poll,
}

/// Why a command buffer was rejected. Always answered with a `FAIL` reply.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    #[error("Empty command")]
    Empty,

    #[error("Invalid command length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("Unknown command tag {0:#04x}")]
    UnknownTag(u8),
}

impl Command {
    /// Decodes a raw command buffer.
    ///
    /// Trailing bytes after a `POLL` tag are ignored; a `SET_PERIOD` must be exactly
    /// [`SET_PERIOD_LEN`] bytes long.
    pub fn parse(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (&tag, payload) = bytes.split_first().ok_or(ProtocolError::Empty)?;

        match MessageType::from_u8(tag) {
            Some(MessageType::SetPeriod) => match payload {
                &[minutes] => Ok(Command::SetPeriod { minutes }),
                _ => Err(ProtocolError::InvalidLength {
                    expected: SET_PERIOD_LEN,
                    got: bytes.len(),
                }),
            },
            Some(MessageType::Poll) => Ok(Command::Poll),
            _ => Err(ProtocolError::UnknownTag(tag)),
        }
    }

    /// Encodes the command the way a remote peer would send it.
    #[cfg(test)]
    pub(crate) fn to_bytes(self) -> arrayvec::ArrayVec<u8, SET_PERIOD_LEN> {
        let mut out = arrayvec::ArrayVec::new();
        match self {
            Command::SetPeriod { minutes } => {
                out.push(MessageType::SetPeriod as u8);
                out.push(minutes);
            }
            Command::Poll => out.push(MessageType::Poll as u8),
        }
        out
    }
}
