//! # trellis-gpu
//!
//! Handle-mediated rendering layer for Trellis.
//!
//! ## Architecture
//!
//! ```text
//!  ElementTree (trellis-ui)
//!       │
//!       ▼
//!  DrawCommandQueue               ◀─── one command per visible rect
//!       │
//!       ▼
//!  FramePipeline.begin_frame()    ◀─── zero-timeout fence gate
//!       │
//!       ▼
//!  vertex::rectangle_vertices()   ◀─── 6 vertices per command
//!       │
//!       ▼
//!  RenderBackend                  ◀─── staging upload, copy, draw
//!       │
//!       ▼
//!  FramePipeline.end_frame()      ◀─── fence issued, cursor advances
//! ```
//!
//! ## Crate modules
//!
//! - [`backend`] — the `RenderBackend` trait and handle newtypes
//! - [`handle`] — opaque handle table for host-side object storage
//! - [`frame`] — virtual frame ring with fence gating
//! - [`queue`] — per-tick draw command queue
//! - [`vertex`] — vertex types, rect emission, orthographic projection
//! - [`shader`] — program compile/link helper
//! - [`mock`] — in-process backend for tests and bring-up

pub mod backend;
pub mod frame;
pub mod handle;
pub mod mock;
pub mod queue;
pub mod shader;
pub mod vertex;

// Re-exports for convenience
pub use backend::{
    BufferHandle, BufferTarget, BufferUsage, DrawMode, FenceHandle, FencePoll, ProgramHandle,
    RenderBackend, ShaderHandle, ShaderStage, VertexArrayHandle,
};
pub use frame::{FrameGate, FramePipeline, VirtualFrame};
pub use handle::HandleTable;
pub use queue::{DrawCommand, DrawCommandQueue, QueueError};
pub use shader::build_program;
pub use vertex::{ortho_projection, rectangle_vertices, RectVertex, VERTEX_STRIDE};
