// src/module/protocol.rs

use core::time::Duration;

use crate::common::command::Command;
use crate::common::hal_traits::{ConfigStore, Publisher, SensorBus};
use crate::common::types::Trigger;
use crate::common::wire::Reply;

use super::MeteoModule;

/// Result of handling one inbound command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandOutcome {
    /// Send this reply now.
    Reply(Reply),
    /// No synchronous reply; the answer arrives later as an acknowledgement emission.
    Deferred,
}

impl CommandOutcome {
    #[inline]
    pub fn emits_later(&self) -> bool {
        matches!(self, CommandOutcome::Deferred)
    }

    /// The reply bytes to transmit, if any.
    pub fn reply(&self) -> Option<Reply> {
        match self {
            CommandOutcome::Reply(reply) => Some(*reply),
            CommandOutcome::Deferred => None,
        }
    }
}

impl<'a, B, S, P> MeteoModule<'a, B, S, P>
where
    B: SensorBus,
    S: ConfigStore,
    P: Publisher,
{
    /// Handles a raw inbound command buffer.
    ///
    /// `SET_PERIOD` is applied immediately and answered with `OK`. `POLL` queues a remote
    /// poll and is answered only by the ack-flagged emission of the next
    /// [`service`](Self::service). Anything malformed is answered with `FAIL` and changes
    /// nothing.
    ///
    /// # Arguments
    ///
    /// * `bytes`: The raw command buffer as received.
    /// * `now`: Current monotonic time, used to re-arm the timer on `SET_PERIOD`.
    ///
    /// # Returns
    ///
    /// The reply to send, or [`CommandOutcome::Deferred`] for `POLL`.
    pub fn handle_command(&mut self, bytes: &[u8], now: Duration) -> CommandOutcome {
        let module_id = self.config.module_id;
        match Command::parse(bytes) {
            Ok(Command::SetPeriod { minutes }) => {
                self.set_period(minutes, now);
                CommandOutcome::Reply(Reply::ok(module_id))
            }
            Ok(Command::Poll) => {
                debug!("Remote poll queued");
                self.trigger(Trigger::ManualPoll { is_remote: true });
                CommandOutcome::Deferred
            }
            Err(e) => {
                warn!("Rejected command: {:?}", e);
                CommandOutcome::Reply(Reply::fail(module_id))
            }
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::command::ProtocolError;
    use crate::common::wire::{ReplyStatus, METEO_MODULE_ID};
    use crate::common::DEFAULT_PUBLISH_PERIOD_MIN;
    use crate::module::storage::tests::MemoryStore;
    use crate::module::tests::{minutes, module_with, secs};
    use crate::module::WakeSlot;
    use crate::sensor::SensorKind;

    #[test]
    fn test_set_period_replies_ok() {
        let wake = WakeSlot::new();
        let mut module = module_with(&wake, &[SensorKind::PrimaryCombo], MemoryStore::default());

        let outcome = module.handle_command(&[0x01, 5], secs(10));
        assert_eq!(outcome, CommandOutcome::Reply(Reply::ok(METEO_MODULE_ID)));
        assert_eq!(outcome.reply().unwrap().to_bytes(), [METEO_MODULE_ID, 0x01]);
        assert!(!outcome.emits_later());
        assert_eq!(module.schedule().publish_period_minutes, 5);
        assert_eq!(module.next_deadline(), Some(secs(10) + minutes(5)));
        assert_eq!(module.store().writes, 1);
    }

    #[test]
    fn test_poll_is_answered_by_one_ack_emission() {
        let wake = WakeSlot::new();
        let mut module = module_with(&wake, &[SensorKind::PrimaryCombo], MemoryStore::default());

        let outcome = module.handle_command(&[0x02], secs(5));
        assert!(outcome.emits_later());
        assert_eq!(outcome.reply(), None);
        // Fusion happens on the worker, not in the command handler.
        assert_eq!(module.sensors().bus().total_reads(), 0);

        let emission = module.service(secs(6)).unwrap();
        assert!(emission.as_ack());
        assert!(module.service(secs(7)).is_err());
        assert_eq!(module.publisher().emissions.len(), 1);
    }

    #[test]
    fn test_poll_ignores_trailing_bytes() {
        let wake = WakeSlot::new();
        let mut module = module_with(&wake, &[], MemoryStore::default());
        assert!(module.handle_command(&[0x02, 0xAA, 0xBB], secs(0)).emits_later());
        assert!(wake.is_pending());
    }

    #[test]
    fn test_malformed_commands_reply_fail_and_change_nothing() {
        let wake = WakeSlot::new();
        let mut module = module_with(&wake, &[SensorKind::PrimaryCombo], MemoryStore::default());
        let before = module.next_deadline();

        for bytes in [&[][..], &[0x01][..], &[0x01, 5, 0][..], &[0x00][..], &[0xFF, 1][..], &[0x42][..]] {
            let outcome = module.handle_command(bytes, secs(30));
            assert_eq!(outcome.reply().map(|r| r.status), Some(ReplyStatus::Fail));
            assert_eq!(outcome.reply().unwrap().to_bytes(), [METEO_MODULE_ID, 0xFF]);
        }

        assert_eq!(module.schedule().publish_period_minutes, DEFAULT_PUBLISH_PERIOD_MIN);
        assert_eq!(module.next_deadline(), before);
        assert_eq!(module.store().writes, 0);
        assert!(!wake.is_pending());
    }

    #[test]
    fn test_parse_error_kinds() {
        assert_eq!(Command::parse(&[]), Err(ProtocolError::Empty));
        assert_eq!(
            Command::parse(&[0x01]),
            Err(ProtocolError::InvalidLength { expected: 2, got: 1 })
        );
    }
}
