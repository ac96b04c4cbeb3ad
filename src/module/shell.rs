// src/module/shell.rs

//! Local operator commands: `meteo get | send | period <N> | reset`.

use core::fmt;
use core::time::Duration;

use crate::common::hal_traits::{ConfigStore, Publisher, SensorBus};
use crate::common::types::{Measurement, Trigger};

use super::MeteoModule;

/// Name the shell command is registered under.
pub const SHELL_NAME: &str = "meteo";

const USAGE: &[&str] = &[
    "meteo get - get results now",
    "meteo send - get and send results now",
    "meteo period <N> - set period to N minutes",
    "meteo reset - reset settings to default",
];

/// Maximum number of words on one shell line (name, subcommand, argument).
const MAX_ARGS: usize = 3;

/// What a successful shell command produced, ready to be printed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShellOutput {
    Usage(&'static [&'static str]),
    Reading(Measurement),
    /// A publish cycle was queued on the worker.
    Sent,
    PeriodSet(u8),
    Reset(u8),
}

impl ShellOutput {
    pub const fn exit_code(&self) -> i32 {
        0
    }
}

impl fmt::Display for ShellOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellOutput::Usage(lines) => {
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    f.write_str(line)?;
                }
                Ok(())
            }
            ShellOutput::Reading(m) => write!(f, "{}", m),
            ShellOutput::Sent => f.write_str("Measurement queued for sending"),
            ShellOutput::PeriodSet(0) | ShellOutput::Reset(0) => f.write_str("Timer stopped"),
            ShellOutput::PeriodSet(minutes) => write!(f, "Period set to {} minute(s)", minutes),
            ShellOutput::Reset(minutes) => write!(f, "Settings reset, period {} minute(s)", minutes),
        }
    }
}

/// Why a shell line was rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShellError {
    #[error("Missing argument for '{0}'")]
    MissingArgument(&'static str),

    #[error("Invalid period: expected minutes in 0..=255")]
    InvalidPeriod,

    #[error("Too many arguments")]
    TooManyArguments,

    #[error("Unknown command")]
    UnknownCommand,
}

impl ShellError {
    /// Process-style exit status: 2 for malformed arguments, 1 otherwise.
    pub const fn exit_code(&self) -> i32 {
        match self {
            ShellError::MissingArgument(_) | ShellError::InvalidPeriod | ShellError::TooManyArguments => 2,
            ShellError::UnknownCommand => 1,
        }
    }
}

/// Dispatcher for the `meteo` shell command.
pub struct Shell;

impl Shell {
    /// Runs one command.
    ///
    /// # Arguments
    ///
    /// * `module`: The module the command acts on.
    /// * `argv`: The words of the command line. `argv[0]` is the command name itself and
    ///   is not inspected.
    /// * `now`: Current monotonic time, used when the period is changed.
    ///
    /// # Returns
    ///
    /// * `Ok(ShellOutput)` to print on success. A bare command name yields the usage text.
    /// * `Err(ShellError)` for unknown subcommands or malformed arguments. Nothing is
    ///   changed in that case.
    pub fn execute<B, S, P>(
        module: &mut MeteoModule<'_, B, S, P>,
        argv: &[&str],
        now: Duration,
    ) -> Result<ShellOutput, ShellError>
    where
        B: SensorBus,
        S: ConfigStore,
        P: Publisher,
    {
        let (subcommand, args) = match argv {
            [] | [_] => return Ok(ShellOutput::Usage(USAGE)),
            [_, subcommand, args @ ..] => (*subcommand, args),
        };

        match (subcommand, args) {
            ("get", []) => Ok(ShellOutput::Reading(module.measure())),
            ("send", []) => {
                module.trigger(Trigger::ManualPoll { is_remote: false });
                Ok(ShellOutput::Sent)
            }
            ("period", []) => Err(ShellError::MissingArgument("period")),
            ("period", [value]) => {
                let minutes = value.parse::<u8>().map_err(|_| ShellError::InvalidPeriod)?;
                module.set_period(minutes, now);
                Ok(ShellOutput::PeriodSet(minutes))
            }
            ("reset", []) => {
                module.reset(now);
                Ok(ShellOutput::Reset(module.schedule().publish_period_minutes))
            }
            ("get" | "send" | "period" | "reset", _) => Err(ShellError::TooManyArguments),
            _ => Err(ShellError::UnknownCommand),
        }
    }

    /// Splits `line` on whitespace and runs it.
    pub fn execute_line<B, S, P>(
        module: &mut MeteoModule<'_, B, S, P>,
        line: &str,
        now: Duration,
    ) -> Result<ShellOutput, ShellError>
    where
        B: SensorBus,
        S: ConfigStore,
        P: Publisher,
    {
        let mut argv: heapless::Vec<&str, MAX_ARGS> = heapless::Vec::new();
        for word in line.split_whitespace() {
            argv.push(word).map_err(|_| ShellError::TooManyArguments)?;
        }
        Self::execute(module, &argv, now)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DEFAULT_PUBLISH_PERIOD_MIN;
    use crate::module::storage::tests::MemoryStore;
    use crate::module::tests::{minutes, module_with, secs};
    use crate::module::WakeSlot;
    use crate::sensor::SensorKind;
    use core::fmt::Write;

    fn render(output: &ShellOutput) -> heapless::String<256> {
        let mut s = heapless::String::new();
        write!(s, "{}", output).unwrap();
        s
    }

    #[test]
    fn test_no_subcommand_prints_usage() {
        let wake = WakeSlot::new();
        let mut module = module_with(&wake, &[], MemoryStore::default());

        let out = Shell::execute(&mut module, &[SHELL_NAME], secs(0)).unwrap();
        assert_eq!(out, ShellOutput::Usage(USAGE));
        assert_eq!(out.exit_code(), 0);
        assert!(render(&out).starts_with("meteo get - get results now\n"));
    }

    #[test]
    fn test_get_reads_without_publishing() {
        let wake = WakeSlot::new();
        let mut module = module_with(&wake, &[SensorKind::PrimaryCombo], MemoryStore::default());

        let out = Shell::execute_line(&mut module, "meteo get", secs(0)).unwrap();
        assert_eq!(
            render(&out).as_str(),
            "Temperature 21.5 C, humidity: 40.2%, pressure: 1013 mbar"
        );
        assert!(module.publisher().emissions.is_empty());
        assert!(!wake.is_pending());
    }

    #[test]
    fn test_send_queues_local_poll() {
        let wake = WakeSlot::new();
        let mut module = module_with(&wake, &[SensorKind::PrimaryCombo], MemoryStore::default());

        assert_eq!(Shell::execute(&mut module, &["meteo", "send"], secs(1)), Ok(ShellOutput::Sent));
        let emission = module.service(secs(2)).unwrap();
        assert_eq!(emission.trigger, Trigger::ManualPoll { is_remote: false });
        assert!(!emission.as_ack());
    }

    #[test]
    fn test_period_sets_and_persists() {
        let wake = WakeSlot::new();
        let mut module = module_with(&wake, &[], MemoryStore::default());

        let out = Shell::execute_line(&mut module, "meteo period 10", secs(5)).unwrap();
        assert_eq!(out, ShellOutput::PeriodSet(10));
        assert_eq!(render(&out).as_str(), "Period set to 10 minute(s)");
        assert_eq!(module.next_deadline(), Some(secs(5) + minutes(10)));
        assert_eq!(module.store().writes, 1);

        let out = Shell::execute_line(&mut module, "meteo period 0", secs(6)).unwrap();
        assert_eq!(render(&out).as_str(), "Timer stopped");
        assert!(!module.scheduler().is_armed());
    }

    #[test]
    fn test_reset_restores_default() {
        let wake = WakeSlot::new();
        let mut module = module_with(&wake, &[], MemoryStore::default());
        module.set_period(45, secs(0));

        let out = Shell::execute(&mut module, &["meteo", "reset"], secs(0)).unwrap();
        assert_eq!(out, ShellOutput::Reset(DEFAULT_PUBLISH_PERIOD_MIN));
        assert_eq!(module.schedule().publish_period_minutes, DEFAULT_PUBLISH_PERIOD_MIN);
    }

    #[test]
    fn test_argument_errors() {
        let wake = WakeSlot::new();
        let mut module = module_with(&wake, &[], MemoryStore::default());

        let err = Shell::execute_line(&mut module, "meteo period", secs(0)).unwrap_err();
        assert_eq!(err, ShellError::MissingArgument("period"));
        assert_eq!(err.exit_code(), 2);

        for line in ["meteo period abc", "meteo period 256", "meteo period -1"] {
            assert_eq!(
                Shell::execute_line(&mut module, line, secs(0)),
                Err(ShellError::InvalidPeriod)
            );
        }

        assert_eq!(
            Shell::execute_line(&mut module, "meteo get now", secs(0)),
            Err(ShellError::TooManyArguments)
        );
        assert_eq!(
            Shell::execute_line(&mut module, "meteo period 1 2", secs(0)),
            Err(ShellError::TooManyArguments)
        );

        let err = Shell::execute_line(&mut module, "meteo calibrate", secs(0)).unwrap_err();
        assert_eq!(err, ShellError::UnknownCommand);
        assert_eq!(err.exit_code(), 1);

        // Nothing above touched the schedule.
        assert_eq!(module.store().writes, 0);
        assert_eq!(module.schedule().publish_period_minutes, DEFAULT_PUBLISH_PERIOD_MIN);
    }

    #[test]
    fn test_error_messages() {
        let mut s: heapless::String<64> = heapless::String::new();
        write!(s, "{}", ShellError::MissingArgument("period")).unwrap();
        assert_eq!(s.as_str(), "Missing argument for 'period'");
    }
}
