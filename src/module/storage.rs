// src/module/storage.rs

//! Persisted form of [`ScheduleConfig`].
//!
//! The blob is `[publish_period_minutes, crc8(publish_period_minutes)]`.

use crate::common::crc::calculate_crc8;
use crate::common::error::MeteoError;
use crate::common::hal_traits::ConfigStore;

use super::scheduler::ScheduleConfig;

/// Size of the persisted configuration blob.
pub const CONFIG_BLOB_LEN: usize = 2;

pub fn encode_config(config: &ScheduleConfig) -> [u8; CONFIG_BLOB_LEN] {
    let period = config.publish_period_minutes;
    [period, calculate_crc8(&[period])]
}

pub fn decode_config(blob: &[u8]) -> Result<ScheduleConfig, MeteoError> {
    match *blob {
        [period, crc] if calculate_crc8(&[period]) == crc => Ok(ScheduleConfig::new(period)),
        _ => Err(MeteoError::PersistCorrupt),
    }
}

/// Loads the schedule stored for `module_id`.
///
/// # Arguments
///
/// * `store`: The non-volatile blob store.
/// * `module_id`: Key of the blob to read.
///
/// # Returns
///
/// * `Ok(Some(config))` if a valid blob was stored.
/// * `Ok(None)` if nothing was stored yet.
/// * `Err(MeteoError::PersistCorrupt)` for a blob of the wrong size or with a bad checksum.
/// * `Err(MeteoError::Storage(e))` if the store itself failed, carrying its error.
pub fn load<S: ConfigStore>(
    store: &mut S,
    module_id: u8,
) -> Result<Option<ScheduleConfig>, MeteoError<S::Error>> {
    let mut buf = [0u8; CONFIG_BLOB_LEN];
    let stored_len = store.read(module_id, &mut buf).map_err(MeteoError::Storage)?;
    match stored_len {
        None => Ok(None),
        Some(CONFIG_BLOB_LEN) => decode_config(&buf)
            .map(Some)
            .map_err(|_| MeteoError::PersistCorrupt),
        Some(_) => Err(MeteoError::PersistCorrupt),
    }
}

/// Writes `config` for `module_id`, replacing whatever was stored.
///
/// A store failure is returned as [`MeteoError::Storage`] with the store's own error.
pub fn save<S: ConfigStore>(
    store: &mut S,
    module_id: u8,
    config: &ScheduleConfig,
) -> Result<(), MeteoError<S::Error>> {
    store
        .write(module_id, &encode_config(config))
        .map_err(MeteoError::Storage)
}
