//! # trellis-runtime
//!
//! Per-tick orchestration for Trellis: event intake, tree rebuild,
//! hit testing, and the render submission path, all hanging off an
//! explicit [`App`] value.
//!
//! ## Crate modules
//!
//! - [`events`] — bounded pointer-event intake ring
//! - [`scratch`] — per-tick arena with page-granular host growth
//! - [`app`] — application context and the tick entry point

pub mod app;
pub mod events;
pub mod scratch;

// Re-exports for convenience
pub use app::{App, AppConfig, AppError, PointerState, TickOutcome, WidgetState};
pub use events::{EventRing, PointerEvent, EVENT_RING_CAPACITY};
pub use scratch::{GrowError, HeapGrower, MemoryGrower, Scratch};
