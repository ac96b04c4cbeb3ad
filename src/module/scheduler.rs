// src/module/scheduler.rs

use core::time::Duration;

use crate::common::timing::period_duration;

/// Persistent publishing schedule.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduleConfig {
    /// Minutes between unsolicited publishes; 0 disables them.
    pub publish_period_minutes: u8,
}

impl ScheduleConfig {
    pub const fn new(publish_period_minutes: u8) -> Self {
        ScheduleConfig {
            publish_period_minutes,
        }
    }

    #[inline]
    pub const fn is_enabled(&self) -> bool {
        self.publish_period_minutes != 0
    }

    #[inline]
    pub const fn period(&self) -> Option<Duration> {
        period_duration(self.publish_period_minutes)
    }
}

/// Where the worker is in its cycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerState {
    /// Waiting for the timer or a trigger.
    Idle,
    /// Executing a fusion + publish cycle.
    ///
    /// Only held for the length of one [`MeteoModule::service`](super::MeteoModule::service)
    /// call, so callers holding the module always observe `Idle`.
    Running,
}

/// Publish timeline: the schedule, the armed deadline, and the cycle state.
///
/// Time is the caller's monotonic clock, expressed as a [`Duration`] since an arbitrary
/// epoch (typically boot). The timer is a single deadline; arming replaces it, which
/// cancels any previously scheduled tick.
#[derive(Debug)]
pub struct Scheduler {
    config: ScheduleConfig,
    deadline: Option<Duration>,
    state: SchedulerState,
}

impl Scheduler {
    /// Creates an idle, disarmed scheduler.
    pub const fn new(config: ScheduleConfig) -> Self {
        Scheduler {
            config,
            deadline: None,
            state: SchedulerState::Idle,
        }
    }

    #[inline]
    pub fn config(&self) -> ScheduleConfig {
        self.config
    }

    #[inline]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// The instant at which the next periodic tick is due, if armed.
    #[inline]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.deadline
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drops the pending tick, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Arms the timer one period after `now`, or leaves it disarmed if the period is 0.
    pub fn arm(&mut self, now: Duration) {
        self.deadline = self.config.period().and_then(|period| now.checked_add(period));
        trace!("timer deadline: {:?} s", self.deadline.map(|d| d.as_secs()));
    }

    /// Cancels the timer and installs a new schedule. The caller re-arms once the new
    /// schedule is persisted.
    pub fn replace_config(&mut self, config: ScheduleConfig) {
        self.cancel();
        self.config = config;
    }

    /// Consumes an elapsed deadline. Returns `true` if a periodic tick is due at `now`.
    pub fn poll_timer(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline && self.config.is_enabled() => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Enters `Running` for one cycle.
    pub(crate) fn begin_cycle(&mut self) {
        self.state = SchedulerState::Running;
    }

    /// Re-arms from `now` and returns to `Idle`.
    pub(crate) fn finish_cycle(&mut self, now: Duration) {
        self.arm(now);
        self.state = SchedulerState::Idle;
    }
}
