//! Per-tick draw command queue.

use std::panic::Location;

use thiserror::Error;
use trellis_ui::ElementIndex;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("draw command queue full (capacity {capacity}), push at {location}")]
    QueueFull {
        capacity: usize,
        location: &'static Location<'static>,
    },
}

/// One rectangle to draw this tick. The element index is only valid
/// within the tick that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub element: ElementIndex,
    pub color: [f32; 4],
}

/// Bounded command list, cleared at the end of every tick.
pub struct DrawCommandQueue {
    commands: Vec<DrawCommand>,
    capacity: usize,
}

impl DrawCommandQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Enqueue a command. Overflow is an error for the whole tick, never
    /// a silent truncation.
    #[track_caller]
    pub fn push(&mut self, command: DrawCommand) -> Result<(), QueueError> {
        if self.commands.len() == self.capacity {
            return Err(QueueError::QueueFull {
                capacity: self.capacity,
                location: Location::caller(),
            });
        }
        self.commands.push(command);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(color: [f32; 4]) -> DrawCommand {
        DrawCommand {
            element: ElementIndex::NONE,
            color,
        }
    }

    #[test]
    fn test_push_iter_clear() {
        let mut queue = DrawCommandQueue::with_capacity(4);
        queue.push(cmd([1.0, 0.0, 0.0, 1.0])).unwrap();
        queue.push(cmd([0.0, 1.0, 0.0, 1.0])).unwrap();
        assert_eq!(queue.len(), 2);
        let colors: Vec<[f32; 4]> = queue.iter().map(|c| c.color).collect();
        assert_eq!(colors[0], [1.0, 0.0, 0.0, 1.0]);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.capacity(), 4);
    }

    #[test]
    fn test_overflow_is_an_error_with_call_site() {
        let mut queue = DrawCommandQueue::with_capacity(1);
        queue.push(cmd([0.0; 4])).unwrap();
        let err = queue.push(cmd([0.0; 4])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("capacity 1"));
        assert!(message.contains("queue.rs"));
        // The failed push left the queue untouched.
        assert_eq!(queue.len(), 1);
    }
}
