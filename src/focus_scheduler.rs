use log::debug;
use std::time::{Duration, Instant};

/// Delay between a navigation request and the focus attempt, long enough for the
/// viewer's scroll animation to settle.
pub const DEFAULT_FOCUS_DELAY: Duration = Duration::from_millis(300);

/// Identity of one scheduled focus attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FocusTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct PendingFocus {
    pub ticket: FocusTicket,
    pub element_id: String,
    pub due_at: Instant,
}

/// One-shot deferred focus tasks, fired in due order by the owner's event loop.
///
/// With `cancel_superseded` off every request survives and the last one to fire
/// wins, so rapid navigation can end up focusing an older target if delays differ.
/// Turning it on keeps only the most recent request.
#[derive(Debug)]
pub struct FocusScheduler {
    pending: Vec<PendingFocus>,
    delay: Duration,
    cancel_superseded: bool,
    next_ticket: u64,
}

impl Default for FocusScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_DELAY, false)
    }
}

impl FocusScheduler {
    pub fn new(delay: Duration, cancel_superseded: bool) -> Self {
        Self {
            pending: Vec::new(),
            delay,
            cancel_superseded,
            next_ticket: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, element_id: impl Into<String>, now: Instant) -> FocusTicket {
        if self.cancel_superseded && !self.pending.is_empty() {
            debug!(
                "Dropping {} superseded focus request(s)",
                self.pending.len()
            );
            self.pending.clear();
        }

        let ticket = FocusTicket(self.next_ticket);
        self.next_ticket += 1;

        let task = PendingFocus {
            ticket,
            element_id: element_id.into(),
            due_at: now + self.delay,
        };
        // Keep the queue ordered by due time, ties by ticket.
        let idx = self
            .pending
            .partition_point(|p| (p.due_at, p.ticket) <= (task.due_at, task.ticket));
        self.pending.insert(idx, task);
        ticket
    }

    /// Cancels a pending task. Returns false if it already fired or was dropped.
    pub fn cancel(&mut self, ticket: FocusTicket) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.ticket != ticket);
        self.pending.len() != before
    }

    /// Removes and returns the tasks due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<PendingFocus> {
        let split = self.pending.partition_point(|p| p.due_at <= now);
        self.pending.drain(..split).collect()
    }

    /// Removes and returns every pending task regardless of due time.
    pub fn take_all(&mut self) -> Vec<PendingFocus> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[PendingFocus] {
        &self.pending
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.first().map(|p| p.due_at)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
