// src/common/error.rs

use crate::sensor::SensorKind;

/// Errors raised while talking to sensors or the configuration store.
///
/// None of these is fatal to the module: a failed sensor read degrades the affected
/// quantity to the absent sentinel for one cycle, and a failed configuration load falls
/// back to defaults.
#[derive(Debug, thiserror::Error)]
pub enum MeteoError<E = ()>
where
    E: core::fmt::Debug,
{
    /// Bus transaction with a present sensor failed.
    #[error("Sensor bus fault: {0:?}")]
    Bus(E),

    /// A read was requested for a sensor that was not found at detection time.
    #[error("Sensor {0:?} is not present")]
    NotPresent(SensorKind),

    /// The bus answered with a reading belonging to another sensor kind.
    #[error("Sensor {expected:?} returned a {got:?} reading")]
    UnexpectedReading { expected: SensorKind, got: SensorKind },

    /// The persisted configuration blob has the wrong size or a bad checksum.
    #[error("Persisted configuration is corrupt")]
    PersistCorrupt,

    /// The configuration store refused a read or write.
    #[error("Configuration store error: {0:?}")]
    Storage(E),
}

// Lets `?` lift a raw bus error out of a `SensorBus` call.
impl<E: core::fmt::Debug> From<E> for MeteoError<E> {
    fn from(e: E) -> Self {
        MeteoError::Bus(e)
    }
}
