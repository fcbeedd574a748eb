//! In-process [`RenderBackend`] for tests, demos, and bring-up before a
//! real host is connected.
//!
//! Objects live in [`HandleTable`]s, buffers store real bytes (so upload
//! and copy paths can be asserted on), and fence polls answer from a
//! scriptable [`FenceBehavior`]. Misuse that a real host would treat as
//! undefined behaviour (writing past a buffer, touching an unbound
//! target) panics here instead.
//!
//! [`RenderBackend`]: crate::backend::RenderBackend
//! [`HandleTable`]: crate::handle::HandleTable

use crate::backend::{
    BufferHandle, BufferTarget, BufferUsage, DrawMode, FenceHandle, FencePoll, ProgramHandle,
    RenderBackend, ShaderHandle, ShaderStage, VertexArrayHandle,
};
use crate::handle::HandleTable;

/// What every fence poll reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FenceBehavior {
    Signaled,
    Timeout,
    Failed,
}

#[derive(Debug)]
pub struct MockBuffer {
    pub data: Vec<u8>,
    pub usage: Option<BufferUsage>,
}

#[derive(Debug)]
pub struct MockShader {
    pub stage: ShaderStage,
    pub source: String,
}

#[derive(Debug, Default)]
pub struct MockProgram {
    pub attached: Vec<ShaderHandle>,
    pub linked: bool,
}

/// Recorded attribute layout call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttribPointer {
    pub index: u32,
    pub components: i32,
    pub stride: usize,
    pub offset: usize,
}

pub struct MockBackend {
    buffers: HandleTable<MockBuffer>,
    vertex_arrays: HandleTable<()>,
    shaders: HandleTable<MockShader>,
    programs: HandleTable<MockProgram>,
    fences: HandleTable<()>,

    bound: [Option<BufferHandle>; 4],
    pub bound_vertex_array: Option<VertexArrayHandle>,
    pub used_program: Option<ProgramHandle>,

    pub fence_behavior: FenceBehavior,
    /// Set to make `compile_shader` / `link_program` fail with a canned log.
    pub fail_compile: bool,
    pub fail_link: bool,

    pub enabled_attribs: Vec<u32>,
    pub attrib_pointers: Vec<AttribPointer>,
    pub draw_calls: Vec<(DrawMode, i32, i32)>,
    pub clear_count: u32,
    pub clear_color: [f32; 4],
    pub fence_polls: u32,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            buffers: HandleTable::new(),
            vertex_arrays: HandleTable::new(),
            shaders: HandleTable::new(),
            programs: HandleTable::new(),
            fences: HandleTable::new(),
            bound: [None; 4],
            bound_vertex_array: None,
            used_program: None,
            fence_behavior: FenceBehavior::Signaled,
            fail_compile: false,
            fail_link: false,
            enabled_attribs: Vec::new(),
            attrib_pointers: Vec::new(),
            draw_calls: Vec::new(),
            clear_count: 0,
            clear_color: [0.0; 4],
            fence_polls: 0,
        }
    }

    fn target_slot(target: BufferTarget) -> usize {
        match target {
            BufferTarget::Array => 0,
            BufferTarget::CopyRead => 1,
            BufferTarget::CopyWrite => 2,
            BufferTarget::Uniform => 3,
        }
    }

    fn bound_buffer(&self, target: BufferTarget) -> BufferHandle {
        self.bound[Self::target_slot(target)]
            .unwrap_or_else(|| panic!("no buffer bound to {target:?}"))
    }

    /// Bytes currently stored in `buffer`.
    pub fn buffer_bytes(&self, buffer: BufferHandle) -> &[u8] {
        &self
            .buffers
            .lookup(buffer.raw())
            .unwrap_or_else(|| panic!("unknown buffer {buffer:?}"))
            .data
    }

    /// Number of live (undeleted) fences.
    pub fn live_fences(&self) -> usize {
        self.fences.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    pub fn program(&self, program: ProgramHandle) -> &MockProgram {
        self.programs
            .lookup(program.raw())
            .unwrap_or_else(|| panic!("unknown program {program:?}"))
    }

    pub fn shader_source_of(&self, shader: ShaderHandle) -> &str {
        &self
            .shaders
            .lookup(shader.raw())
            .unwrap_or_else(|| panic!("unknown shader {shader:?}"))
            .source
    }
}

impl RenderBackend for MockBackend {
    fn create_buffer(&mut self) -> BufferHandle {
        BufferHandle(self.buffers.allocate(MockBuffer {
            data: Vec::new(),
            usage: None,
        }))
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        self.buffers.release(buffer.raw());
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: BufferHandle) {
        assert!(self.buffers.lookup(buffer.raw()).is_some(), "bind of unknown buffer");
        self.bound[Self::target_slot(target)] = Some(buffer);
    }

    fn bind_buffer_range(
        &mut self,
        target: BufferTarget,
        _binding: u32,
        buffer: BufferHandle,
        offset: usize,
        size: usize,
    ) {
        let len = self.buffer_bytes(buffer).len();
        assert!(offset + size <= len, "bind_buffer_range past end of buffer");
        self.bound[Self::target_slot(target)] = Some(buffer);
    }

    fn buffer_data(&mut self, target: BufferTarget, size: usize, usage: BufferUsage) {
        let handle = self.bound_buffer(target);
        let buffer = self.buffers.lookup_mut(handle.raw()).unwrap();
        buffer.data = vec![0; size];
        buffer.usage = Some(usage);
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, bytes: &[u8]) {
        let handle = self.bound_buffer(target);
        let buffer = self.buffers.lookup_mut(handle.raw()).unwrap();
        assert!(
            offset + bytes.len() <= buffer.data.len(),
            "buffer_sub_data past end of buffer"
        );
        buffer.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    fn copy_buffer_sub_data(
        &mut self,
        read: BufferTarget,
        write: BufferTarget,
        read_offset: usize,
        write_offset: usize,
        size: usize,
    ) {
        let src_handle = self.bound_buffer(read);
        let dst_handle = self.bound_buffer(write);
        let src: Vec<u8> = {
            let data = &self.buffers.lookup(src_handle.raw()).unwrap().data;
            assert!(read_offset + size <= data.len(), "copy read past end of buffer");
            data[read_offset..read_offset + size].to_vec()
        };
        let dst = &mut self.buffers.lookup_mut(dst_handle.raw()).unwrap().data;
        assert!(write_offset + size <= dst.len(), "copy write past end of buffer");
        dst[write_offset..write_offset + size].copy_from_slice(&src);
    }

    fn create_vertex_array(&mut self) -> VertexArrayHandle {
        VertexArrayHandle(self.vertex_arrays.allocate(()))
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.vertex_arrays.release(vertex_array.raw());
    }

    fn bind_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.bound_vertex_array = Some(vertex_array);
    }

    fn enable_vertex_attrib(&mut self, index: u32) {
        self.enabled_attribs.push(index);
    }

    fn vertex_attrib_pointer(&mut self, index: u32, components: i32, stride: usize, offset: usize) {
        self.attrib_pointers.push(AttribPointer {
            index,
            components,
            stride,
            offset,
        });
    }

    fn create_shader(&mut self, stage: ShaderStage) -> ShaderHandle {
        ShaderHandle(self.shaders.allocate(MockShader {
            stage,
            source: String::new(),
        }))
    }

    fn shader_source(&mut self, shader: ShaderHandle, source: &str) {
        self.shaders
            .lookup_mut(shader.raw())
            .unwrap_or_else(|| panic!("unknown shader {shader:?}"))
            .source = source.to_owned();
    }

    fn compile_shader(&mut self, shader: ShaderHandle) -> Result<(), String> {
        let stage = self
            .shaders
            .lookup(shader.raw())
            .unwrap_or_else(|| panic!("unknown shader {shader:?}"))
            .stage;
        if self.fail_compile {
            Err(format!("mock {stage:?} shader compile failure"))
        } else {
            Ok(())
        }
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        self.shaders.release(shader.raw());
    }

    fn create_program(&mut self) -> ProgramHandle {
        ProgramHandle(self.programs.allocate(MockProgram::default()))
    }

    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        self.programs
            .lookup_mut(program.raw())
            .unwrap_or_else(|| panic!("unknown program {program:?}"))
            .attached
            .push(shader);
    }

    fn detach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        let attached = &mut self
            .programs
            .lookup_mut(program.raw())
            .unwrap_or_else(|| panic!("unknown program {program:?}"))
            .attached;
        attached.retain(|&s| s != shader);
    }

    fn link_program(&mut self, program: ProgramHandle) -> Result<(), String> {
        let entry = self
            .programs
            .lookup_mut(program.raw())
            .unwrap_or_else(|| panic!("unknown program {program:?}"));
        if self.fail_link {
            Err("mock program link failure".to_owned())
        } else {
            entry.linked = true;
            Ok(())
        }
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.programs.release(program.raw());
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.used_program = Some(program);
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.clear_color = [r, g, b, a];
    }

    fn clear(&mut self) {
        self.clear_count += 1;
    }

    fn draw_arrays(&mut self, mode: DrawMode, first: i32, count: i32) {
        self.draw_calls.push((mode, first, count));
    }

    fn fence_sync(&mut self) -> FenceHandle {
        FenceHandle(self.fences.allocate(()))
    }

    fn delete_sync(&mut self, fence: FenceHandle) {
        self.fences.release(fence.raw());
    }

    fn poll_fence(&mut self, fence: FenceHandle) -> FencePoll {
        assert!(self.fences.lookup(fence.raw()).is_some(), "poll of unknown fence");
        self.fence_polls += 1;
        match self.fence_behavior {
            FenceBehavior::Signaled => FencePoll::Signaled,
            FenceBehavior::Timeout => FencePoll::Timeout,
            FenceBehavior::Failed => FencePoll::Failed,
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
