// src/common/hal_traits.rs

//! Boundaries to the collaborators the module does not implement itself: the per-chip
//! bus drivers, the non-volatile configuration store, and the outbound transport.

use core::fmt::Debug;

use crate::module::Emission;
use crate::sensor::{RawReading, SensorKind};

/// Access to the sensor chips sharing one bus.
///
/// Implementations wrap the individual chip drivers. Every call is a blocking bus
/// transaction with a finite duration; the module never calls into the bus from more
/// than one cycle at a time.
pub trait SensorBus {
    /// Bus-level failure, classified through the embedded-hal I2C error model.
    type Error: embedded_hal::i2c::Error;

    /// Initializes the chip for `kind`. `Ok` means the chip answered and is usable.
    fn probe(&mut self, kind: SensorKind) -> Result<(), Self::Error>;

    /// Performs one measurement on the chip for `kind`, in that chip's native scale.
    ///
    /// The returned reading must be the variant matching `kind`.
    fn read(&mut self, kind: SensorKind) -> Result<RawReading, Self::Error>;
}

/// Opaque per-module blob storage in non-volatile memory.
pub trait ConfigStore {
    /// Associated error type for storage failures.
    type Error: Debug;

    /// Copies the blob stored for `module_id` into `buf`.
    ///
    /// Returns `Ok(None)` if nothing is stored, otherwise the full stored length, which may
    /// differ from `buf.len()`; at most `buf.len()` bytes are copied.
    fn read(&mut self, module_id: u8, buf: &mut [u8]) -> Result<Option<usize>, Self::Error>;

    /// Replaces the blob stored for `module_id`.
    fn write(&mut self, module_id: u8, blob: &[u8]) -> Result<(), Self::Error>;
}

/// Receives every produced data record.
///
/// Called from the worker once per publish cycle, after fusion has completed.
pub trait Publisher {
    fn publish(&mut self, emission: Emission);
}
