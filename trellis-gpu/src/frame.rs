//! Virtual frame pipeline.
//!
//! A fixed ring of N frame slots, each owning a staging buffer and an
//! optional fence. A slot's staging buffer may only be rewritten once
//! the fence guarding its previous submission has signaled, which bounds
//! CPU/GPU overlap to N frames without ever blocking the CPU: the fence
//! is checked with a single zero-timeout poll per tick.

use crate::backend::{BufferHandle, BufferTarget, BufferUsage, FenceHandle, FencePoll, RenderBackend};

/// One slot of the ring.
#[derive(Clone, Copy, Debug)]
pub struct VirtualFrame {
    pub staging: BufferHandle,
    /// `None` means no GPU work is pending on this slot.
    pub fence: Option<FenceHandle>,
}

/// Verdict of [`FramePipeline::begin_frame`] for the current slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameGate {
    /// Staging buffer is free; render this tick.
    Renderable,
    /// Fence still pending. Skip the render, retry next tick.
    NotReady,
    /// The host's fence wait failed. Skip the render; already logged.
    WaitFailed,
}

pub struct FramePipeline {
    frames: Vec<VirtualFrame>,
    cursor: usize,
}

impl FramePipeline {
    /// Create `frame_count` slots, each with a `staging_len`-byte
    /// stream-draw staging buffer and no pending fence.
    pub fn new(backend: &mut impl RenderBackend, frame_count: usize, staging_len: usize) -> Self {
        let frames = (0..frame_count)
            .map(|_| {
                let staging = backend.create_buffer();
                backend.bind_buffer(BufferTarget::CopyRead, staging);
                backend.buffer_data(BufferTarget::CopyRead, staging_len, BufferUsage::StreamDraw);
                VirtualFrame {
                    staging,
                    fence: None,
                }
            })
            .collect();
        Self { frames, cursor: 0 }
    }

    /// Gate the current slot on its fence with one zero-timeout poll.
    ///
    /// A timeout keeps the fence and the cursor untouched so the same
    /// slot is retried next tick. A failed wait does the same but is
    /// logged; the fence may signal on a later poll.
    pub fn begin_frame(&mut self, backend: &mut impl RenderBackend) -> FrameGate {
        let frame = &mut self.frames[self.cursor];
        let Some(fence) = frame.fence else {
            return FrameGate::Renderable;
        };
        match backend.poll_fence(fence) {
            FencePoll::Signaled => {
                backend.delete_sync(fence);
                frame.fence = None;
                FrameGate::Renderable
            }
            FencePoll::Timeout => FrameGate::NotReady,
            FencePoll::Failed => {
                log::error!("fence wait failed on virtual frame {}", self.cursor);
                FrameGate::WaitFailed
            }
        }
    }

    /// Issue a fence for the work submitted this tick and advance to the
    /// next slot. Call only after a `Renderable` gate.
    pub fn end_frame(&mut self, backend: &mut impl RenderBackend) {
        let frame = &mut self.frames[self.cursor];
        debug_assert!(frame.fence.is_none(), "end_frame on a still-fenced slot");
        frame.fence = Some(backend.fence_sync());
        self.cursor = (self.cursor + 1) % self.frames.len();
    }

    /// The current slot.
    pub fn current(&self) -> &VirtualFrame {
        &self.frames[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

// ===================================================================
// Tests
// ===================================================================
