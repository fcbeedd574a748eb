//! Pointer event intake.
//!
//! The host pushes events as they arrive; the tick drains them all at
//! once. The ring is bounded: when it is full the incoming event is
//! dropped, on the grounds that a host outrunning the tick by a whole
//! ring's worth of events has bigger problems than one lost sample.

/// A pointer event as delivered by the host, in viewport pixels with a
/// top-left origin (the tick flips Y).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Move { x: i32, y: i32 },
    Down { button: i32 },
    Up { button: i32 },
}

pub const EVENT_RING_CAPACITY: usize = 64;

/// Bounded intake buffer, drained fully every tick.
pub struct EventRing {
    events: Vec<PointerEvent>,
    capacity: usize,
}

impl Default for EventRing {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRing {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_RING_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Buffer an event. On overflow the incoming event is dropped.
    pub fn push(&mut self, event: PointerEvent) {
        if self.events.len() == self.capacity {
            log::debug!("event ring full ({} events), dropping {event:?}", self.capacity);
            return;
        }
        self.events.push(event);
    }

    /// Yield all buffered events in arrival order and clear the ring.
    pub fn drain(&mut self) -> std::vec::Drain<'_, PointerEvent> {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ===================================================================
// Tests
// ===================================================================
