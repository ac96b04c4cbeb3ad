// src/module/mod.rs

//! The module context: sensors, schedule, persistence and publisher behind one owner.
//!
//! All state that used to be global lives in [`MeteoModule`]. Producers that may run
//! elsewhere (button interrupt, radio stack) only hold the shared [`WakeSlot`]; every
//! fusion cycle runs inside [`MeteoModule::service`] on the worker.

mod protocol;
pub mod scheduler;
pub mod shell;
pub mod storage;
mod wake;

use core::convert::Infallible;
use core::time::Duration;

use crate::common::hal_traits::{ConfigStore, Publisher, SensorBus};
use crate::common::timing::DEFAULT_PUBLISH_PERIOD_MIN;
use crate::common::types::{Measurement, Trigger};
use crate::common::wire::{WireRecord, METEO_MODULE_ID};
use crate::common::MeteoError;
use crate::sensor::{FusionEngine, SensorMask, SensorSet};

pub use protocol::CommandOutcome;
pub use scheduler::{ScheduleConfig, Scheduler, SchedulerState};
pub use shell::{Shell, ShellError, ShellOutput};
pub use wake::WakeSlot;

/// Static identity and defaults of the module.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModuleConfig {
    /// First byte of every record and reply.
    pub module_id: u8,
    /// Period used when nothing valid is persisted, and restored by reset.
    pub default_period_minutes: u8,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        ModuleConfig {
            module_id: METEO_MODULE_ID,
            default_period_minutes: DEFAULT_PUBLISH_PERIOD_MIN,
        }
    }
}

/// What the publisher receives for one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    /// The encoded 16-byte record handed to the transport.
    pub record: WireRecord,
    /// The fused values the record was built from.
    pub measurement: Measurement,
    /// What caused this cycle.
    pub trigger: Trigger,
}

impl Emission {
    /// `true` if this emission answers a remote `POLL` rather than being unsolicited.
    #[inline]
    pub fn as_ack(&self) -> bool {
        self.trigger.is_ack()
    }
}

/// One meteo module instance.
pub struct MeteoModule<'a, B, S, P> {
    config: ModuleConfig,
    sensors: SensorSet<B>,
    store: S,
    publisher: P,
    scheduler: Scheduler,
    wake: &'a WakeSlot,
}

impl<'a, B, S, P> MeteoModule<'a, B, S, P>
where
    B: SensorBus,
    S: ConfigStore,
    P: Publisher,
{
    /// Loads the persisted schedule, detects sensors and arms the publish timer from `now`.
    ///
    /// A missing or corrupt configuration falls back to `config.default_period_minutes`.
    /// A module with no sensors still starts; it publishes all-absent records.
    ///
    /// # Arguments
    ///
    /// * `config`: Module identity and default period.
    /// * `bus`: Access to the sensor chips.
    /// * `store`: Non-volatile configuration storage.
    /// * `publisher`: Receives every emission.
    /// * `wake`: The slot trigger sources signal, usually a `static`.
    /// * `now`: Current monotonic time; the first tick is one period after it.
    pub fn init(
        config: ModuleConfig,
        bus: B,
        mut store: S,
        publisher: P,
        wake: &'a WakeSlot,
        now: Duration,
    ) -> Self {
        let defaults = ScheduleConfig::new(config.default_period_minutes);
        let schedule = match storage::load(&mut store, config.module_id) {
            Ok(Some(schedule)) => schedule,
            Ok(None) => defaults,
            Err(MeteoError::PersistCorrupt) => {
                warn!("Stored configuration corrupt, using defaults");
                defaults
            }
            Err(_) => {
                warn!("Configuration store unreadable, using defaults");
                defaults
            }
        };
        info!("Publish period: {} min", schedule.publish_period_minutes);

        let mut sensors = SensorSet::new(bus);
        sensors.detect();

        let mut scheduler = Scheduler::new(schedule);
        scheduler.arm(now);

        MeteoModule {
            config,
            sensors,
            store,
            publisher,
            scheduler,
            wake,
        }
    }

    #[inline]
    pub fn module_config(&self) -> ModuleConfig {
        self.config
    }

    #[inline]
    pub fn schedule(&self) -> ScheduleConfig {
        self.scheduler.config()
    }

    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The instant the worker should next wake up for a periodic tick, if armed.
    #[inline]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    #[inline]
    pub fn present_sensors(&self) -> SensorMask {
        self.sensors.present()
    }

    #[inline]
    pub fn sensors(&self) -> &SensorSet<B> {
        &self.sensors
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// The wake slot producers signal; hand this to interrupt handlers.
    #[inline]
    pub fn wake_slot(&self) -> &'a WakeSlot {
        self.wake
    }

    /// Queues a publish cycle. Never runs fusion itself.
    #[inline]
    pub fn trigger(&self, trigger: Trigger) {
        self.wake.signal(trigger);
    }

    /// Fuses the current sensor readings without publishing anything.
    pub fn measure(&mut self) -> Measurement {
        let measurement = self.sensors.measure();
        info!(
            "Temperature {} C/10, humidity: {} %/10, pressure: {} mbar",
            measurement.temperature_decidegrees,
            measurement.humidity_decipercent,
            measurement.pressure_mbar
        );
        measurement
    }

    /// Runs the worker once.
    ///
    /// Converts an elapsed timer into a tick, then takes the pending request from the wake
    /// slot. If there is one, runs exactly one fusion + publish cycle and re-arms the timer
    /// from `now`.
    ///
    /// # Arguments
    ///
    /// * `now`: Current monotonic time.
    ///
    /// # Returns
    ///
    /// * `Ok(Emission)`: The emission that was just handed to the publisher.
    /// * `Err(nb::Error::WouldBlock)`: Nothing was pending. Call again at
    ///   [`next_deadline`](Self::next_deadline) or after the next trigger.
    pub fn service(&mut self, now: Duration) -> nb::Result<Emission, Infallible> {
        if self.scheduler.poll_timer(now) {
            self.wake.signal(Trigger::PeriodicTick);
        }
        let trigger = self.wake.take().ok_or(nb::Error::WouldBlock)?;

        self.scheduler.begin_cycle();
        let measurement = self.measure();
        let emission = Emission {
            record: FusionEngine::encode(self.config.module_id, &measurement),
            measurement,
            trigger,
        };
        debug!("Publishing, ack: {}", emission.as_ack());
        self.publisher.publish(emission.clone());
        self.scheduler.finish_cycle(now);

        Ok(emission)
    }

    /// Changes the publish period.
    ///
    /// Cancels the pending tick, stores and persists the new schedule, then re-arms from
    /// `now` unless `minutes` is 0. A failed write is logged; the new period still applies.
    pub fn set_period(&mut self, minutes: u8, now: Duration) {
        let schedule = ScheduleConfig::new(minutes);
        self.scheduler.replace_config(schedule);
        if storage::save(&mut self.store, self.config.module_id, &schedule).is_err() {
            warn!("Failed to persist publish period");
        }
        self.scheduler.arm(now);

        if schedule.is_enabled() {
            info!("Period set to {} minute(s)", minutes);
        } else {
            info!("Timer stopped");
        }
    }

    /// Restores and persists the default publish period.
    pub fn reset(&mut self, now: Duration) {
        self.set_period(self.config.default_period_minutes, now);
    }
}
