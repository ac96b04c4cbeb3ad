// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod crc;
pub mod error;
pub mod hal_traits;
pub mod timing;
pub mod types;
pub mod wire;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::{Command, ProtocolError};

// From crc.rs
pub use crc::calculate_crc8;

// From error.rs
pub use error::MeteoError;

// From hal_traits.rs
pub use hal_traits::{ConfigStore, Publisher, SensorBus};

// From timing.rs (constants - users can access via common::timing::*)
pub use timing::DEFAULT_PUBLISH_PERIOD_MIN;

// From types.rs
pub use types::{Measurement, Trigger, ABSENT};

// From wire.rs
pub use wire::{MessageType, Reply, ReplyStatus, WireError, WireRecord, METEO_MODULE_ID};
