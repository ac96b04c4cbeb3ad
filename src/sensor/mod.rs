// src/sensor/mod.rs

// Sensor side of the module: which chips exist, what they return, and how their
// readings are fused into one measurement.

mod fusion;
mod kind;
mod reading;
pub(crate) mod set;

// --- Public Re-exports ---
pub use fusion::FusionEngine;
pub use kind::{SensorKind, SensorMask};
pub use reading::RawReading;
pub use set::SensorSet;
