// src/module/wake.rs

use portable_atomic::{AtomicU8, Ordering};

use crate::common::types::Trigger;

const TICK: u8 = 1 << 0;
const LOCAL_POLL: u8 = 1 << 1;
const REMOTE_POLL: u8 = 1 << 2;

/// Single-slot wake signal between trigger sources and the worker.
///
/// Producers (timer expiry, remote poll, shell, button interrupt) only set bits here and
/// never touch sensors or configuration. Any number of signals between two
/// [`take`](Self::take) calls collapse into one pending request, so they produce exactly
/// one publish cycle. Lock-free and usable from interrupt context and from a `static`.
#[derive(Debug)]
pub struct WakeSlot {
    pending: AtomicU8,
}

impl WakeSlot {
    pub const fn new() -> Self {
        WakeSlot {
            pending: AtomicU8::new(0),
        }
    }

    /// Records `trigger` as pending.
    pub fn signal(&self, trigger: Trigger) {
        let bit = match trigger {
            Trigger::PeriodicTick => TICK,
            Trigger::ManualPoll { is_remote: false } => LOCAL_POLL,
            Trigger::ManualPoll { is_remote: true } => REMOTE_POLL,
        };
        self.pending.fetch_or(bit, Ordering::AcqRel);
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire) != 0
    }

    /// Empties the slot and returns the pending request, if any.
    ///
    /// When several triggers were coalesced, a remote poll wins over a local poll, which
    /// wins over a tick: the one emission then acknowledges the remote request.
    pub fn take(&self) -> Option<Trigger> {
        let bits = self.pending.swap(0, Ordering::AcqRel);
        if bits & REMOTE_POLL != 0 {
            Some(Trigger::ManualPoll { is_remote: true })
        } else if bits & LOCAL_POLL != 0 {
            Some(Trigger::ManualPoll { is_remote: false })
        } else if bits & TICK != 0 {
            Some(Trigger::PeriodicTick)
        } else {
            None
        }
    }
}

impl Default for WakeSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SLOT: WakeSlot = WakeSlot::new();

    #[test]
    fn test_empty_slot() {
        let slot = WakeSlot::new();
        assert!(!slot.is_pending());
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_single_trigger_round_trip() {
        let slot = WakeSlot::new();
        slot.signal(Trigger::PeriodicTick);
        assert!(slot.is_pending());
        assert_eq!(slot.take(), Some(Trigger::PeriodicTick));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_coalescing_prefers_remote_poll() {
        let slot = WakeSlot::new();
        slot.signal(Trigger::ManualPoll { is_remote: true });
        slot.signal(Trigger::PeriodicTick);
        slot.signal(Trigger::ManualPoll { is_remote: false });
        assert_eq!(slot.take(), Some(Trigger::ManualPoll { is_remote: true }));
        assert_eq!(slot.take(), None);

        slot.signal(Trigger::PeriodicTick);
        slot.signal(Trigger::ManualPoll { is_remote: false });
        assert_eq!(slot.take(), Some(Trigger::ManualPoll { is_remote: false }));
    }

    #[test]
    fn test_static_slot_across_threads() {
        let producers: std::vec::Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let trigger = if i % 2 == 0 {
                        Trigger::PeriodicTick
                    } else {
                        Trigger::ManualPoll { is_remote: false }
                    };
                    SLOT.signal(trigger);
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }
        assert_eq!(SLOT.take(), Some(Trigger::ManualPoll { is_remote: false }));
        assert!(!SLOT.is_pending());
    }
}
