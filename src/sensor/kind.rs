// src/sensor/kind.rs

use core::fmt;

/// A physical quantity the module reports.
#[cfg(test)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quantity {
    Temperature,
    Humidity,
    Pressure,
}

/// The sensor chips the module knows how to use.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SensorKind {
    /// Combined temperature, humidity and pressure chip (BME280).
    PrimaryCombo = 0,
    /// Temperature and humidity chip (SHT21).
    HumidityTemp = 1,
    /// Temperature and pressure chip (LPS331AP).
    PressureTemp = 2,
    /// Temperature-only chip (LM75).
    TemperatureOnly = 3,
}

impl SensorKind {
    /// Fixed order in which chips are probed on the bus.
    pub const PROBE_ORDER: [SensorKind; 4] = [
        SensorKind::PrimaryCombo,
        SensorKind::HumidityTemp,
        SensorKind::PressureTemp,
        SensorKind::TemperatureOnly,
    ];

    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }

    pub const fn part_number(self) -> &'static str {
        match self {
            SensorKind::PrimaryCombo => "BME280",
            SensorKind::HumidityTemp => "SHT21",
            SensorKind::PressureTemp => "LPS331AP",
            SensorKind::TemperatureOnly => "LM75",
        }
    }

    /// Priority rank of this kind for `quantity`, 0 being the highest.
    ///
    /// `None` if the chip cannot measure that quantity. Mirrors the order `fuse` applies,
    /// except for the temperature-only gate, which depends on the whole present set.
    #[cfg(test)]
    pub(crate) const fn rank(self, quantity: Quantity) -> Option<u8> {
        match (quantity, self) {
            (_, SensorKind::PrimaryCombo) => Some(0),
            (Quantity::Temperature, SensorKind::HumidityTemp) => Some(1),
            (Quantity::Temperature, SensorKind::PressureTemp) => Some(2),
            (Quantity::Temperature, SensorKind::TemperatureOnly) => Some(3),
            (Quantity::Humidity, SensorKind::HumidityTemp) => Some(1),
            (Quantity::Pressure, SensorKind::PressureTemp) => Some(1),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) const fn supplies(self, quantity: Quantity) -> bool {
        self.rank(quantity).is_some()
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.part_number())
    }
}

/// Set of sensor kinds, used to record which chips were found at detection.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorMask(u8);

impl SensorMask {
    pub const EMPTY: SensorMask = SensorMask(0);
    pub const ALL: SensorMask = SensorMask(0b1111);

    pub const fn from_kinds(kinds: &[SensorKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        SensorMask(bits)
    }

    /// Builds a mask from the low four bits, in `SensorKind` discriminant order.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        SensorMask(bits & Self::ALL.0)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, kind: SensorKind) -> bool {
        self.0 & kind.bit() != 0
    }

    #[inline]
    pub const fn with(self, kind: SensorKind) -> Self {
        SensorMask(self.0 | kind.bit())
    }

    #[inline]
    pub fn insert(&mut self, kind: SensorKind) {
        self.0 |= kind.bit();
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the contained kinds in probe order.
    pub fn iter(self) -> impl Iterator<Item = SensorKind> {
        SensorKind::PROBE_ORDER
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_ops() {
        let mask = SensorMask::EMPTY
            .with(SensorKind::HumidityTemp)
            .with(SensorKind::TemperatureOnly);
        assert!(mask.contains(SensorKind::HumidityTemp));
        assert!(mask.contains(SensorKind::TemperatureOnly));
        assert!(!mask.contains(SensorKind::PrimaryCombo));
        assert!(!mask.contains(SensorKind::PressureTemp));
        assert_eq!(mask.len(), 2);
        assert_eq!(mask.bits(), 0b1010);
        assert!(SensorMask::EMPTY.is_empty());
        assert_eq!(
            SensorMask::from_kinds(&[SensorKind::HumidityTemp, SensorKind::TemperatureOnly]),
            mask
        );
        assert_eq!(SensorMask::from_bits_truncate(0xFF), SensorMask::ALL);
    }

    #[test]
    fn test_mask_iterates_in_probe_order() {
        let mask = SensorMask::from_kinds(&[SensorKind::TemperatureOnly, SensorKind::PrimaryCombo]);
        let mut iter = mask.iter();
        assert_eq!(iter.next(), Some(SensorKind::PrimaryCombo));
        assert_eq!(iter.next(), Some(SensorKind::TemperatureOnly));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_ranks() {
        assert_eq!(SensorKind::PrimaryCombo.rank(Quantity::Pressure), Some(0));
        assert_eq!(SensorKind::HumidityTemp.rank(Quantity::Temperature), Some(1));
        assert_eq!(SensorKind::PressureTemp.rank(Quantity::Temperature), Some(2));
        assert_eq!(SensorKind::TemperatureOnly.rank(Quantity::Temperature), Some(3));
        assert!(SensorKind::HumidityTemp.supplies(Quantity::Humidity));
        assert!(!SensorKind::PressureTemp.supplies(Quantity::Humidity));
        assert!(!SensorKind::HumidityTemp.supplies(Quantity::Pressure));
        assert!(!SensorKind::TemperatureOnly.supplies(Quantity::Humidity));
        assert!(!SensorKind::TemperatureOnly.supplies(Quantity::Pressure));
    }

    #[test]
    fn test_part_numbers() {
        assert_eq!(SensorKind::PrimaryCombo.to_string(), "BME280");
        assert_eq!(SensorKind::TemperatureOnly.part_number(), "LM75");
    }
}
