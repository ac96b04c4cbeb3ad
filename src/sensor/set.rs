// src/sensor/set.rs

use embedded_hal::i2c::Error as _;

use crate::common::error::MeteoError;
use crate::common::hal_traits::SensorBus;
use crate::common::types::Measurement;

use super::fusion::FusionEngine;
use super::kind::{SensorKind, SensorMask};
use super::reading::RawReading;

/// The chips on the shared bus, together with which of them were found at detection.
#[derive(Debug)]
pub struct SensorSet<B> {
    bus: B,
    present: SensorMask,
}

impl<B> SensorSet<B>
where
    B: SensorBus,
{
    /// Wraps `bus`. No chip is considered present until [`detect`](Self::detect) runs.
    pub fn new(bus: B) -> Self {
        SensorSet {
            bus,
            present: SensorMask::EMPTY,
        }
    }

    /// Probes every known chip in [`SensorKind::PROBE_ORDER`] and records which answered.
    ///
    /// A chip that fails to initialize stays excluded until `detect` is called again.
    pub fn detect(&mut self) -> SensorMask {
        let mut present = SensorMask::EMPTY;
        for kind in SensorKind::PROBE_ORDER {
            match self.bus.probe(kind) {
                Ok(()) => {
                    info!("{} sensor found", kind.part_number());
                    present.insert(kind);
                }
                Err(e) => {
                    debug!("{} not found: {:?}", kind.part_number(), e.kind());
                }
            }
        }
        if present.is_empty() {
            warn!("No sensors found");
        }
        self.present = present;
        present
    }

    #[inline]
    pub fn present(&self) -> SensorMask {
        self.present
    }

    /// Runs one bus transaction on the chip for `kind`.
    ///
    /// Kinds not found at detection are rejected without touching the bus. Failures are
    /// reported, never retried.
    pub fn read(&mut self, kind: SensorKind) -> Result<RawReading, MeteoError<B::Error>> {
        if !self.present.contains(kind) {
            return Err(MeteoError::NotPresent(kind));
        }

        // `?` lifts the raw bus error into `MeteoError::Bus`.
        let reading = self
            .bus
            .read(kind)
            .inspect_err(|e| warn!("{} read failed: {:?}", kind.part_number(), e.kind()))?;

        if reading.kind() != kind {
            warn!("{} returned a foreign reading", kind.part_number());
            return Err(MeteoError::UnexpectedReading {
                expected: kind,
                got: reading.kind(),
            });
        }
        Ok(reading)
    }

    /// Reads the chips the fusion policy needs and fuses them into one measurement.
    pub fn measure(&mut self) -> Measurement {
        let present = self.present;
        FusionEngine::fuse(present, |kind| self.read(kind))
    }

    #[inline]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    #[inline]
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}
