//! Virtual-time event scheduler.
//!
//! A min-priority queue keyed by `(time, sequence)`: the earliest event runs
//! first and events scheduled for the same instant run in the order they
//! were scheduled. Nothing here ever waits on a wall clock.

use plum_env::SimTime;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use thiserror::Error;
use tracing::trace;

/// Errors from scheduling an event.
#[derive(Debug, Error, PartialEq)]
pub enum SchedulerError {
    /// Delay is negative, NaN or infinite
    #[error("Invalid delay {0}")]
    InvalidDelay(f64),

    /// Absolute time lies before the current virtual time
    #[error("Cannot schedule at {at} (now is {now})")]
    InPast { at: SimTime, now: SimTime },
}

/// An event waiting in the queue.
#[derive(Debug)]
struct ScheduledEvent<E> {
    at: SimTime,
    /// Insertion order, breaks ties between equal times
    sequence: u64,
    event: E,
}

impl<E> PartialEq for ScheduledEvent<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E> Eq for ScheduledEvent<E> {}

impl<E> PartialOrd for ScheduledEvent<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for ScheduledEvent<E> {
    // Reversed: BinaryHeap is a max-heap, we want the earliest on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .at
            .cmp(&self.at)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Discrete-event scheduler over events of type `E`.
pub struct Scheduler<E> {
    now: SimTime,
    next_sequence: u64,
    queue: BinaryHeap<ScheduledEvent<E>>,
    events_processed: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    /// Creates an empty scheduler at virtual time zero.
    pub fn new() -> Self {
        Self {
            now: SimTime::ZERO,
            next_sequence: 0,
            queue: BinaryHeap::new(),
            events_processed: 0,
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of events handed out so far.
    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Schedules `event` at `now + delay`.
    pub fn schedule(&mut self, delay: f64, event: E) -> Result<(), SchedulerError> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(SchedulerError::InvalidDelay(delay));
        }
        self.push(self.now + delay, event);
        Ok(())
    }

    /// Schedules `event` at an absolute time no earlier than now.
    pub fn schedule_at(&mut self, at: SimTime, event: E) -> Result<(), SchedulerError> {
        if !at.as_secs().is_finite() {
            return Err(SchedulerError::InvalidDelay(at.as_secs()));
        }
        if at < self.now {
            return Err(SchedulerError::InPast { at, now: self.now });
        }
        self.push(at, event);
        Ok(())
    }

    fn push(&mut self, at: SimTime, event: E) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        trace!(now = %self.now, at = %at, sequence, "Event scheduled");
        self.queue.push(ScheduledEvent { at, sequence, event });
    }

    /// Pops the next event if it is due at or before `until`, advancing the
    /// clock to its time.
    pub fn pop_until(&mut self, until: SimTime) -> Option<(SimTime, E)> {
        if self.queue.peek()?.at > until {
            return None;
        }
        let item = self.queue.pop()?;
        self.now = item.at;
        self.events_processed += 1;
        Some((item.at, item.event))
    }

    /// Dispatches events in order until none remain at or before `until`.
    ///
    /// The handler may schedule further events. Running out of events is
    /// the normal way a run ends; the clock is then left at `until`.
    /// Returns the number of events dispatched by this call.
    pub fn run<F, Err>(&mut self, until: SimTime, mut handler: F) -> Result<u64, Err>
    where
        F: FnMut(&mut Self, SimTime, E) -> Result<(), Err>,
    {
        let mut dispatched = 0;
        while let Some((at, event)) = self.pop_until(until) {
            dispatched += 1;
            handler(self, at, event)?;
        }
        self.now = self.now.max(until);
        Ok(dispatched)
    }
}
