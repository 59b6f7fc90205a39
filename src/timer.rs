use std::time::{Duration, Instant};

/// Handle for an armed feedback timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Single-shot delay used for success/error flashes.
///
/// At most one timer is outstanding: arming a new one replaces the previous
/// deadline. Expiry is observed by polling, so a cancelled timer can never fire.
#[derive(Debug, Default)]
pub struct FeedbackTimer {
    pending: Option<(TimerId, Instant)>,
}

impl FeedbackTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `id` to expire `delay` from now.
    pub fn after(&mut self, delay: Duration, id: TimerId) -> TimerId {
        self.after_from(Instant::now(), delay, id)
    }

    pub fn after_from(&mut self, now: Instant, delay: Duration, id: TimerId) -> TimerId {
        if let Some((old, _)) = self.pending {
            log::debug!("timer {old:?} replaced by {id:?}");
        }
        self.pending = Some((id, now + delay));
        id
    }

    /// Cancel `id` if it is still pending. Returns whether anything was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.pending {
            Some((pending, _)) if pending == id => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the pending deadline, zero if already due.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }

    /// Take the pending timer if its deadline has passed.
    pub fn take_expired(&mut self, now: Instant) -> Option<TimerId> {
        match self.pending {
            Some((id, deadline)) if deadline <= now => {
                self.pending = None;
                Some(id)
            }
            _ => None,
        }
    }
}
