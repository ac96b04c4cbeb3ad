// src/common/types.rs

use core::fmt;

// --- Fused Measurement ---

/// Sentinel stored in a [`Measurement`] field when no present sensor could supply it.
///
/// On the wire this is `0x7FFF`. Consumers must read it as "absent", never as the
/// literal value 3276.7 °C / 3276.7 %RH / 32767 mbar.
pub const ABSENT: i16 = i16::MAX;

/// Largest value a real reading may take after saturation (one below [`ABSENT`]).
pub const MAX_PRESENT: i16 = ABSENT - 1;

/// The fused measurement triple in the common fixed-point representation.
///
/// Temperature and humidity are in tenths of a unit, pressure in whole millibar.
/// Each field is either a saturated real value or [`ABSENT`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub temperature_decidegrees: i16,
    pub humidity_decipercent: i16,
    pub pressure_mbar: i16,
}

impl Measurement {
    /// A measurement with every quantity absent.
    pub const ABSENT: Measurement = Measurement {
        temperature_decidegrees: ABSENT,
        humidity_decipercent: ABSENT,
        pressure_mbar: ABSENT,
    };

    /// Temperature in tenths of a degree Celsius, if some sensor supplied it.
    pub fn temperature(&self) -> Option<i16> {
        present(self.temperature_decidegrees)
    }

    /// Relative humidity in tenths of a percent, if some sensor supplied it.
    pub fn humidity(&self) -> Option<i16> {
        present(self.humidity_decipercent)
    }

    /// Pressure in millibar, if some sensor supplied it.
    pub fn pressure(&self) -> Option<i16> {
        present(self.pressure_mbar)
    }

    /// Returns `true` if no quantity could be supplied.
    pub fn is_absent(&self) -> bool {
        *self == Self::ABSENT
    }
}

impl Default for Measurement {
    fn default() -> Self {
        Self::ABSENT
    }
}

#[inline]
fn present(raw: i16) -> Option<i16> {
    (raw != ABSENT).then_some(raw)
}

// Writes a tenths value as `[-]int.frac`.
fn write_tenths(f: &mut fmt::Formatter<'_>, value: i16) -> fmt::Result {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Temperature ")?;
        match self.temperature() {
            Some(t) => write_tenths(f, t)?,
            None => f.write_str("n/a")?,
        }
        f.write_str(" C, humidity: ")?;
        match self.humidity() {
            Some(h) => write_tenths(f, h)?,
            None => f.write_str("n/a")?,
        }
        f.write_str("%, pressure: ")?;
        match self.pressure() {
            Some(p) => write!(f, "{}", p)?,
            None => f.write_str("n/a")?,
        }
        f.write_str(" mbar")
    }
}

// --- Fixed-Point Scaling ---

/// Integer division rounding half up: half the divisor is added before truncating.
///
/// `235 / 10 -> 24`, `234 / 10 -> 23`. The addition saturates instead of overflowing.
#[inline]
pub const fn round_half_up(raw: i32, divisor: i32) -> i32 {
    raw.saturating_add(divisor / 2) / divisor
}

/// Clamps a converted value into the range a real reading may occupy on the wire.
#[inline]
pub fn saturate(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(MAX_PRESENT)) as i16
}

/// Converts a native fixed-point value into the common representation.
#[inline]
pub fn scale(raw: i32, divisor: i32) -> i16 {
    saturate(round_half_up(raw, divisor))
}

// --- Triggers ---

/// The event that woke the worker for a publish cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// The publish period elapsed.
    PeriodicTick,
    /// Someone asked for a measurement now: the shell or button (`is_remote == false`)
    /// or the remote `POLL` command (`is_remote == true`).
    ManualPoll { is_remote: bool },
}

impl Trigger {
    /// Whether the resulting emission acknowledges a remote poll request.
    #[inline]
    pub const fn is_ack(&self) -> bool {
        matches!(self, Trigger::ManualPoll { is_remote: true })
    }
}
