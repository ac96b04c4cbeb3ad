// src/lib.rs

#![cfg_attr(not(test), no_std)] // no_std everywhere except unit tests

#[macro_use]
mod logging;

pub mod common;
pub mod module;
pub mod sensor;

// Re-export key types for convenience
pub use common::{Measurement, MeteoError, Trigger};
pub use module::{CommandOutcome, Emission, MeteoModule, ModuleConfig, Shell, WakeSlot};
pub use sensor::{SensorKind, SensorMask};
