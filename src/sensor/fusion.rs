// src/sensor/fusion.rs

//! Sensor-priority fusion.
//!
//! Given the set of chips found at detection, picks exactly one source per quantity:
//!
//! * A combo chip, if present, supplies all three quantities and nothing else is read.
//! * Otherwise temperature comes from the humidity chip, else the pressure chip, and the
//!   temperature-only chip is consulted only when neither of those two is present.
//! * Humidity only ever comes from the humidity chip, pressure from the pressure chip.
//!
//! Presence decides the source, not read success: if the chosen chip fails its bus
//! transaction, the quantity is absent for this cycle and lower-ranked chips are not
//! consulted as a fallback.

use crate::common::types::{scale, Measurement};
use crate::common::wire::{WireError, WireRecord};

use super::kind::{SensorKind, SensorMask};
use super::reading::RawReading;

// Native scale -> common scale divisors.
const CENTI_TO_DECI: i32 = 10;
const MILLI_TO_DECI: i32 = 100;
const PA_TO_MBAR: i32 = 100;
const MBAR_TO_MBAR: i32 = 1;

/// Stateless fusion and serialization entry points.
pub struct FusionEngine;

impl FusionEngine {
    /// Fuses the readings of the `present` chips into one [`Measurement`].
    ///
    /// `read` is invoked lazily, at most once per kind, and only for kinds in `present`
    /// whose value can end up in the result. A failed read or a reading of the wrong
    /// variant leaves the affected quantities absent.
    ///
    /// # Arguments
    ///
    /// * `present`: The chips found at detection.
    /// * `read`: Performs one bus transaction for the given kind.
    ///
    /// # Returns
    ///
    /// The fused triple, with [`ABSENT`](crate::common::ABSENT) in every quantity no
    /// chosen chip could supply.
    pub fn fuse<E, F>(present: SensorMask, mut read: F) -> Measurement
    where
        F: FnMut(SensorKind) -> Result<RawReading, E>,
    {
        let mut measurement = Measurement::ABSENT;

        if present.contains(SensorKind::PrimaryCombo) {
            // The combo chip outranks everything else; skip the rest of the bus.
            if let Ok(RawReading::PrimaryCombo {
                temperature_centi_c,
                humidity_centi_pct,
                pressure_pa,
            }) = read(SensorKind::PrimaryCombo)
            {
                measurement.temperature_decidegrees = scale(temperature_centi_c, CENTI_TO_DECI);
                measurement.humidity_decipercent = scale(humidity_centi_pct, CENTI_TO_DECI);
                measurement.pressure_mbar = scale(pressure_pa, PA_TO_MBAR);
            }
            return measurement;
        }

        let has_humidity_temp = present.contains(SensorKind::HumidityTemp);
        let has_pressure_temp = present.contains(SensorKind::PressureTemp);

        if !has_humidity_temp && !has_pressure_temp && present.contains(SensorKind::TemperatureOnly) {
            if let Ok(RawReading::TemperatureOnly { temperature_milli_c }) =
                read(SensorKind::TemperatureOnly)
            {
                measurement.temperature_decidegrees = scale(temperature_milli_c, MILLI_TO_DECI);
            }
        }

        if has_pressure_temp {
            if let Ok(RawReading::PressureTemp {
                temperature_milli_c,
                pressure_mbar,
            }) = read(SensorKind::PressureTemp)
            {
                // The humidity chip has the better thermometer.
                if !has_humidity_temp {
                    measurement.temperature_decidegrees = scale(temperature_milli_c, MILLI_TO_DECI);
                }
                measurement.pressure_mbar = scale(pressure_mbar, MBAR_TO_MBAR);
            }
        }

        if has_humidity_temp {
            if let Ok(RawReading::HumidityTemp {
                temperature_milli_c,
                humidity_milli_pct,
            }) = read(SensorKind::HumidityTemp)
            {
                measurement.temperature_decidegrees = scale(temperature_milli_c, MILLI_TO_DECI);
                measurement.humidity_decipercent = scale(humidity_milli_pct, MILLI_TO_DECI);
            }
        }

        measurement
    }

    /// Serializes a fused measurement into the 16-byte wire record.
    #[inline]
    pub fn encode(module_id: u8, measurement: &Measurement) -> WireRecord {
        WireRecord::encode(module_id, measurement)
    }

    /// Recovers the measurement from a received wire record.
    ///
    /// Rejects buffers that are not exactly 16 bytes or do not carry the data tag.
    pub fn decode(raw: &[u8]) -> Result<Measurement, WireError> {
        WireRecord::from_bytes(raw).map(|record| record.measurement())
    }
}
