//! # trellis-ui
//!
//! Retained, data-oriented UI element tree for the Trellis runtime.
//!
//! ## Architecture
//!
//! ```text
//!  begin_ui()                        ◀─── O(1) reset, indices invalidated
//!       │
//!       ▼
//!  push_element() × N                ◀─── strict preorder, parent < child
//!       │
//!       ▼
//!  layout()                          ◀─── pass 1: extents (children first)
//!       │                                 pass 2: placement (parents first)
//!       ▼
//!  transform()                       ◀─── relative → absolute positions
//!       │
//!       ▼
//!  bounds() / hit testing
//! ```
//!
//! The tree is rebuilt from scratch every tick.  `ElementIndex` values are
//! only meaningful between one `begin_ui()` and the next; `ElementId` values
//! (call-site fingerprints) are stable across ticks and key persistent
//! widget state.
//!
//! ## Crate modules
//!
//! - [`id`] — cross-frame stable element identity
//! - [`math`] — minimal 2-D vector type
//! - [`tree`] — flat parallel-array element storage and transform pass
//! - [`layout`] — two-pass auto-layout solver
//! - [`hit`] — absolute-bounds hit testing

pub mod hit;
pub mod id;
pub mod layout;
pub mod math;
pub mod tree;

// Re-exports for convenience
pub use hit::Aabb;
pub use id::ElementId;
pub use math::Vec2;
pub use tree::{Axis, Element, ElementConstraints, ElementIndex, ElementTree, Padding, TreeError};
