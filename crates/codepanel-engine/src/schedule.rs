//! Fire-and-forget deferred tasks.
//!
//! Cosmetic effects that run after a delay: revealing a block's expand button
//! once layout has settled, re-adding a button's `active` class and taking
//! down a "Link Copied" note. None of them affects correctness if it runs
//! late or not at all, so there is no cancellation.

use std::time::Duration;

use crate::classes;
use crate::dom::Document;

/// Delay before the expand button of a clamped block is shown.
pub const REVEAL_DELAY: Duration = Duration::from_millis(150);
/// Delay before a clicked button gets its `active` class back.
pub const PULSE_DELAY: Duration = Duration::from_millis(50);
/// How long copy feedback stays on the page.
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred<N> {
    /// Drop `panel_hide` from a control.
    Reveal { node: N },
    /// Re-add the `active` class to a control.
    Pulse { node: N },
    /// Take a temporary element off the page for good.
    Dismiss { node: N },
}

impl<N> Deferred<N> {
    pub fn run<D: Document<Node = N>>(self, doc: &mut D) {
        match self {
            Deferred::Reveal { node } => doc.remove_class(&node, classes::PANEL_HIDE),
            Deferred::Pulse { node } => doc.add_class(&node, classes::ACTIVE),
            Deferred::Dismiss { node } => doc.discard(&node),
        }
    }
}

pub trait Scheduler<N> {
    fn defer(&mut self, delay: Duration, task: Deferred<N>);
}

/// Virtual-clock scheduler: tasks run when [`TaskQueue::advance`] moves the
/// clock past their deadline, in deadline order (ties in submission order).
#[derive(Debug)]
pub struct TaskQueue<N> {
    now: Duration,
    next_seq: u64,
    pending: Vec<(Duration, u64, Deferred<N>)>,
}

impl<N> Default for TaskQueue<N> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            pending: Vec::new(),
        }
    }
}

impl<N> TaskQueue<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Advance the clock by `elapsed` and run every task that is now due.
    /// Returns how many tasks ran.
    pub fn advance<D: Document<Node = N>>(&mut self, elapsed: Duration, doc: &mut D) -> usize {
        self.now += elapsed;
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(deadline, _, _)| *deadline <= now);
        self.pending = waiting;

        due.sort_by_key(|(deadline, seq, _)| (*deadline, *seq));
        let ran = due.len();
        for (_, _, task) in due {
            task.run(doc);
        }
        ran
    }

    /// Run everything still pending, however far in the future.
    pub fn flush<D: Document<Node = N>>(&mut self, doc: &mut D) -> usize {
        let latest = self
            .pending
            .iter()
            .map(|(deadline, _, _)| *deadline)
            .max()
            .unwrap_or(self.now);
        self.advance(latest.saturating_sub(self.now), doc)
    }
}

impl<N> Scheduler<N> for TaskQueue<N> {
    fn defer(&mut self, delay: Duration, task: Deferred<N>) {
        self.pending.push((self.now + delay, self.next_seq, task));
        self.next_seq += 1;
    }
}
