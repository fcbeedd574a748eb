//! Application context and the per-tick entry point.
//!
//! [`App`] is an explicit value: every piece of cross-tick state (the
//! element tree, event intake, frame ring, hover map, GPU handles) lives
//! in it and is threaded through [`App::tick`]. There is no global
//! context.
//!
//! A tick runs in a fixed order:
//!
//! ```text
//!  drain events ─▶ rebuild tree ─▶ layout + transform
//!       │
//!       ▼
//!  hit-test + enqueue draw commands
//!       │
//!       ▼
//!  begin_frame gate ──NotReady/WaitFailed──▶ Skipped
//!       │ Renderable
//!       ▼
//!  assemble vertices ─▶ staging upload ─▶ copy to geometry
//!       │
//!       ▼
//!  clear ─▶ draw ─▶ end_frame ─▶ Rendered
//! ```
//!
//! The draw queue and scratch arena are cleared unconditionally at the
//! end of every tick, rendered or not.

use rustc_hash::FxHashMap;
use thiserror::Error;

use trellis_gpu::backend::{
    BufferHandle, BufferTarget, BufferUsage, DrawMode, ProgramHandle, RenderBackend,
    VertexArrayHandle,
};
use trellis_gpu::frame::{FrameGate, FramePipeline};
use trellis_gpu::queue::{DrawCommand, DrawCommandQueue, QueueError};
use trellis_gpu::shader::build_program;
use trellis_gpu::vertex::{
    ortho_projection, rectangle_vertices, COLOR_OFFSET, POSITION_OFFSET, VERTEX_STRIDE,
};
use trellis_ui::{ElementId, ElementIndex, ElementTree, TreeError};

use crate::events::{EventRing, PointerEvent};
use crate::scratch::{GrowError, MemoryGrower, Scratch};

// ───────────────────────── shaders ─────────────────────────

const VERT_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec2 a_position;
layout(location = 1) in vec4 a_color;
layout(std140) uniform Scene {
    mat4 u_proj_view;
};
out vec4 v_color;
void main() {
    v_color = a_color;
    gl_Position = u_proj_view * vec4(a_position, 0.0, 1.0);
}
"#;

const FRAG_SHADER: &str = r#"#version 300 es
precision mediump float;
in vec4 v_color;
out vec4 o_color;
void main() {
    o_color = v_color;
}
"#;

// ───────────────────────── draw attributes ─────────────────────────

pub const COLOR_DEFAULT: [f32; 4] = [0.25, 0.27, 0.32, 1.0];
pub const COLOR_HOVER: [f32; 4] = [0.45, 0.48, 0.58, 1.0];
pub const COLOR_CLEAR: [f32; 4] = [0.08, 0.08, 0.10, 1.0];

// ───────────────────────── errors ─────────────────────────

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error(transparent)]
    Grow(#[from] GrowError),
}

// ───────────────────────── config ─────────────────────────

/// Sizing knobs fixed at [`App::new`].
///
/// The staging and geometry buffers must hold a full queue's worth of
/// vertices: `queue_capacity * 6 * 24` bytes must not exceed
/// `staging_len` or `geometry_len`. [`App::new`] panics otherwise.
#[derive(Clone, Copy, Debug)]
pub struct AppConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub element_capacity: usize,
    pub constraint_capacity: usize,
    pub queue_capacity: usize,
    /// Virtual frame ring depth.
    pub frame_count: usize,
    /// Per-slot staging buffer size in bytes.
    pub staging_len: usize,
    /// Geometry store size in bytes.
    pub geometry_len: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            element_capacity: 4096,
            constraint_capacity: 64,
            queue_capacity: 512,
            frame_count: 3,
            staging_len: 1 << 20,
            geometry_len: 20 * 1024 * 1024,
        }
    }
}

// ───────────────────────── state ─────────────────────────

/// Pointer state derived from drained events, in bottom-left-origin
/// viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub pressed: bool,
}

/// Per-widget state that survives tree rebuilds, keyed by [`ElementId`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WidgetState {
    pub hovered: bool,
}

/// What a tick produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered { vertices: u32 },
    /// Frame gate held the tick back; nothing was drawn.
    Skipped,
}

pub struct App<G: MemoryGrower> {
    tree: ElementTree,
    events: EventRing,
    frames: FramePipeline,
    queue: DrawCommandQueue,
    scratch: Scratch<G>,
    widgets: FxHashMap<ElementId, WidgetState>,
    pointer: PointerState,

    geometry: BufferHandle,
    scene: BufferHandle,
    vertex_array: VertexArrayHandle,
    program: ProgramHandle,

    viewport_height: f32,
    last_timestamp: Option<f64>,
    last_delta: f64,
}

impl<G: MemoryGrower> App<G> {
    /// Set up every GPU object the tick relies on: staging ring, shader
    /// program, scene uniform (orthographic projection at uniform
    /// binding 0), vertex array with the interleaved rect layout, and
    /// the geometry store.
    pub fn new(backend: &mut impl RenderBackend, grower: G, config: AppConfig) -> Self {
        // Every upload path assumes a full queue of rects fits both
        // buffers, so reject configs that break that up front.
        let max_vertex_bytes = config.queue_capacity * 6 * VERTEX_STRIDE;
        assert!(
            max_vertex_bytes <= config.staging_len && max_vertex_bytes <= config.geometry_len,
            "queue capacity {} needs {} vertex bytes, exceeding staging_len ({}) or geometry_len ({})",
            config.queue_capacity,
            max_vertex_bytes,
            config.staging_len,
            config.geometry_len,
        );

        let frames = FramePipeline::new(backend, config.frame_count, config.staging_len);
        let program = build_program(backend, VERT_SHADER, FRAG_SHADER);

        let scene = backend.create_buffer();
        let projection = ortho_projection(config.viewport_width, config.viewport_height);
        let matrix_bytes = bytemuck::bytes_of(&projection);
        backend.bind_buffer(BufferTarget::Uniform, scene);
        backend.buffer_data(BufferTarget::Uniform, matrix_bytes.len(), BufferUsage::StaticDraw);
        backend.buffer_sub_data(BufferTarget::Uniform, 0, matrix_bytes);
        backend.bind_buffer_range(BufferTarget::Uniform, 0, scene, 0, matrix_bytes.len());

        let vertex_array = backend.create_vertex_array();
        backend.bind_vertex_array(vertex_array);
        let geometry = backend.create_buffer();
        backend.bind_buffer(BufferTarget::Array, geometry);
        backend.buffer_data(BufferTarget::Array, config.geometry_len, BufferUsage::StaticDraw);
        backend.enable_vertex_attrib(0);
        backend.vertex_attrib_pointer(0, 2, VERTEX_STRIDE, POSITION_OFFSET);
        backend.enable_vertex_attrib(1);
        backend.vertex_attrib_pointer(1, 4, VERTEX_STRIDE, COLOR_OFFSET);

        let mut scratch = Scratch::new(grower);
        scratch.clear();

        Self {
            tree: ElementTree::with_capacity(config.element_capacity, config.constraint_capacity),
            events: EventRing::new(),
            frames,
            queue: DrawCommandQueue::with_capacity(config.queue_capacity),
            scratch,
            widgets: FxHashMap::default(),
            pointer: PointerState::default(),
            geometry,
            scene,
            vertex_array,
            program,
            viewport_height: config.viewport_height,
            last_timestamp: None,
            last_delta: 0.0,
        }
    }

    /// Buffer a host event for the next tick.
    pub fn push_event(&mut self, event: PointerEvent) {
        self.events.push(event);
    }

    /// Run one tick. `timestamp` is monotonic seconds; `build` pushes
    /// this tick's elements into the tree.
    ///
    /// A capacity error aborts the tick with nothing rendered. The draw
    /// queue and scratch arena are cleared on every path out.
    pub fn tick<B, F>(
        &mut self,
        backend: &mut B,
        timestamp: f64,
        build: F,
    ) -> Result<TickOutcome, AppError>
    where
        B: RenderBackend,
        F: FnOnce(&mut ElementTree) -> Result<(), TreeError>,
    {
        self.last_delta = timestamp - self.last_timestamp.unwrap_or(timestamp);
        self.last_timestamp = Some(timestamp);

        let outcome = self.run_tick(backend, build);
        self.queue.clear();
        self.scratch.clear();
        outcome
    }

    fn run_tick<B, F>(&mut self, backend: &mut B, build: F) -> Result<TickOutcome, AppError>
    where
        B: RenderBackend,
        F: FnOnce(&mut ElementTree) -> Result<(), TreeError>,
    {
        // 1. Events. The latest move wins; Y is flipped into the
        // bottom-left-origin space the tree lives in.
        for event in self.events.drain() {
            match event {
                PointerEvent::Move { x, y } => {
                    self.pointer.x = x as f32;
                    self.pointer.y = self.viewport_height - y as f32;
                }
                PointerEvent::Down { button: _ } => self.pointer.pressed = true,
                PointerEvent::Up { button: _ } => self.pointer.pressed = false,
            }
        }

        // 2. Rebuild and resolve the tree.
        self.tree.begin_ui();
        build(&mut self.tree)?;
        self.tree.end_ui();

        // 3. Hit-test every element and enqueue its draw command.
        for i in 0..self.tree.len() {
            let index = ElementIndex::new(i);
            let hovered = self.tree.bounds(index).contains(self.pointer.x, self.pointer.y);
            let id = self.tree.get(index).id;
            self.widgets.insert(id, WidgetState { hovered });
            let color = if hovered { COLOR_HOVER } else { COLOR_DEFAULT };
            self.queue.push(DrawCommand { element: index, color })?;
        }

        // 4. Gate on the current virtual frame.
        match self.frames.begin_frame(backend) {
            FrameGate::Renderable => {}
            FrameGate::NotReady | FrameGate::WaitFailed => return Ok(TickOutcome::Skipped),
        }

        // 5. Assemble vertices into scratch.
        for command in self.queue.iter() {
            let pos = self.tree.position(command.element);
            let extent = self.tree.get(command.element).extent;
            let verts = rectangle_vertices(pos, extent, command.color);
            self.scratch.push_bytes(bytemuck::cast_slice(&verts))?;
        }

        // 6. Upload through the current staging slot into the geometry
        // store, then draw.
        let bytes = self.scratch.as_slice();
        let staging = self.frames.current().staging;
        backend.bind_buffer(BufferTarget::CopyRead, staging);
        backend.buffer_sub_data(BufferTarget::CopyRead, 0, bytes);
        backend.bind_buffer(BufferTarget::CopyWrite, self.geometry);
        backend.copy_buffer_sub_data(
            BufferTarget::CopyRead,
            BufferTarget::CopyWrite,
            0,
            0,
            bytes.len(),
        );

        let vertices = (bytes.len() / VERTEX_STRIDE) as u32;
        backend.clear_color(COLOR_CLEAR[0], COLOR_CLEAR[1], COLOR_CLEAR[2], COLOR_CLEAR[3]);
        backend.clear();
        backend.use_program(self.program);
        backend.bind_vertex_array(self.vertex_array);
        backend.draw_arrays(DrawMode::Triangles, 0, vertices as i32);

        self.frames.end_frame(backend);
        Ok(TickOutcome::Rendered { vertices })
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Cross-tick state for the widget identified by `id`, if it has
    /// been seen in a tick.
    pub fn widget(&self, id: ElementId) -> Option<WidgetState> {
        self.widgets.get(&id).copied()
    }

    pub fn event_ring(&self) -> &EventRing {
        &self.events
    }

    /// Seconds between the two most recent ticks.
    pub fn last_delta(&self) -> f64 {
        self.last_delta
    }

    pub fn geometry_buffer(&self) -> BufferHandle {
        self.geometry
    }

    pub fn scene_buffer(&self) -> BufferHandle {
        self.scene
    }

    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    pub fn vertex_array(&self) -> VertexArrayHandle {
        self.vertex_array
    }
}
