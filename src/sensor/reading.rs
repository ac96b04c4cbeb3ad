// src/sensor/reading.rs

use super::kind::SensorKind;

/// One measurement from one chip, in that chip's native fixed-point scale.
///
/// Produced on demand by [`SensorBus::read`](crate::common::SensorBus::read) and never
/// cached between cycles.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RawReading {
    PrimaryCombo {
        /// Hundredths of a degree Celsius.
        temperature_centi_c: i32,
        /// Hundredths of a percent relative humidity.
        humidity_centi_pct: i32,
        /// Pascal.
        pressure_pa: i32,
    },
    HumidityTemp {
        /// Thousandths of a degree Celsius.
        temperature_milli_c: i32,
        /// Thousandths of a percent relative humidity.
        humidity_milli_pct: i32,
    },
    PressureTemp {
        /// Thousandths of a degree Celsius.
        temperature_milli_c: i32,
        /// Whole millibar.
        pressure_mbar: i32,
    },
    TemperatureOnly {
        /// Thousandths of a degree Celsius.
        temperature_milli_c: i32,
    },
}

impl RawReading {
    /// The sensor kind this reading belongs to.
    pub const fn kind(&self) -> SensorKind {
        match self {
            RawReading::PrimaryCombo { .. } => SensorKind::PrimaryCombo,
            RawReading::HumidityTemp { .. } => SensorKind::HumidityTemp,
            RawReading::PressureTemp { .. } => SensorKind::PressureTemp,
            RawReading::TemperatureOnly { .. } => SensorKind::TemperatureOnly,
        }
    }
}
