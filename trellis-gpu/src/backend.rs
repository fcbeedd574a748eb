//! Rendering-backend boundary.
//!
//! The core never holds raw references to host graphics objects. Every
//! buffer, vertex array, shader, program and fence is named by a nonzero
//! integer handle minted on the host side, and every operation goes
//! through the [`RenderBackend`] trait. Handles are plain `u32` newtypes;
//! `0` is reserved as the invalid value and is never issued.

// ───────────────────────── handles ─────────────────────────

macro_rules! backend_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub u32);

        impl $name {
            /// Raw host-side id.
            #[inline(always)]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }
    };
}

backend_handle!(
    /// Opaque name for a host buffer object.
    BufferHandle
);
backend_handle!(
    /// Opaque name for a host vertex array object.
    VertexArrayHandle
);
backend_handle!(
    /// Opaque name for a host shader object.
    ShaderHandle
);
backend_handle!(
    /// Opaque name for a host program object.
    ProgramHandle
);
backend_handle!(
    /// Opaque name for a host fence object.
    FenceHandle
);

// ───────────────────────── enums ─────────────────────────

/// Buffer bind points the core uses. Mapping to concrete graphics-API
/// values is the host's concern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
    CopyRead,
    CopyWrite,
    Uniform,
}

/// Allocation usage hints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferUsage {
    /// Written once, drawn many times (geometry store).
    StaticDraw,
    /// Rewritten every frame (staging ring).
    StreamDraw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawMode {
    Triangles,
}

/// Result of a single zero-timeout fence poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FencePoll {
    /// The GPU has passed the fence; the guarded resources are free.
    Signaled,
    /// Still pending. Backpressure, not an error.
    Timeout,
    /// The host reported a wait failure.
    Failed,
}

// ───────────────────────── trait ─────────────────────────

/// Everything the core asks of the host renderer.
///
/// Implementations live on the host side of the boundary: a WebGL table
/// in a browser embedding, [`MockBackend`] in tests. All calls take
/// `&mut self`; the core is single-threaded per tick.
///
/// [`MockBackend`]: crate::mock::MockBackend
pub trait RenderBackend {
    // Buffers.
    fn create_buffer(&mut self) -> BufferHandle;
    fn delete_buffer(&mut self, buffer: BufferHandle);
    fn bind_buffer(&mut self, target: BufferTarget, buffer: BufferHandle);
    fn bind_buffer_range(
        &mut self,
        target: BufferTarget,
        binding: u32,
        buffer: BufferHandle,
        offset: usize,
        size: usize,
    );
    /// Allocate `size` zeroed bytes for the buffer bound to `target`.
    fn buffer_data(&mut self, target: BufferTarget, size: usize, usage: BufferUsage);
    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, bytes: &[u8]);
    fn copy_buffer_sub_data(
        &mut self,
        read: BufferTarget,
        write: BufferTarget,
        read_offset: usize,
        write_offset: usize,
        size: usize,
    );

    // Vertex arrays.
    fn create_vertex_array(&mut self) -> VertexArrayHandle;
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle);
    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle);
    fn enable_vertex_attrib(&mut self, index: u32);
    /// Describe a float attribute in the bound array buffer.
    fn vertex_attrib_pointer(&mut self, index: u32, components: i32, stride: usize, offset: usize);

    // Shaders and programs.
    fn create_shader(&mut self, stage: ShaderStage) -> ShaderHandle;
    fn shader_source(&mut self, shader: ShaderHandle, source: &str);
    /// `Err` carries the host's info log.
    fn compile_shader(&mut self, shader: ShaderHandle) -> Result<(), String>;
    fn delete_shader(&mut self, shader: ShaderHandle);
    fn create_program(&mut self) -> ProgramHandle;
    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle);
    fn detach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle);
    /// `Err` carries the host's info log.
    fn link_program(&mut self, program: ProgramHandle) -> Result<(), String>;
    fn delete_program(&mut self, program: ProgramHandle);
    fn use_program(&mut self, program: ProgramHandle);

    // Clear and draw.
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&mut self);
    fn draw_arrays(&mut self, mode: DrawMode, first: i32, count: i32);

    // Fences.
    fn fence_sync(&mut self) -> FenceHandle;
    fn delete_sync(&mut self, fence: FenceHandle);
    /// Single non-blocking poll with a zero timeout. Never waits.
    fn poll_fence(&mut self, fence: FenceHandle) -> FencePoll;
}
