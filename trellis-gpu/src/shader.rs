//! Shader program assembly.

use crate::backend::{ProgramHandle, RenderBackend, ShaderStage};

/// Compile and link a vertex + fragment program.
///
/// Compile and link failures are reported through the log and do not
/// abort: the returned handle may name a non-functional program, and
/// later draws through it are the host's problem to surface. There is
/// no fallback shader.
pub fn build_program(
    backend: &mut impl RenderBackend,
    vert_src: &str,
    frag_src: &str,
) -> ProgramHandle {
    let program = backend.create_program();
    let vert = backend.create_shader(ShaderStage::Vertex);
    let frag = backend.create_shader(ShaderStage::Fragment);

    backend.shader_source(vert, vert_src);
    backend.shader_source(frag, frag_src);
    if let Err(info_log) = backend.compile_shader(vert) {
        log::error!("vertex shader compile failed: {info_log}");
    }
    if let Err(info_log) = backend.compile_shader(frag) {
        log::error!("fragment shader compile failed: {info_log}");
    }

    backend.attach_shader(program, vert);
    backend.attach_shader(program, frag);
    if let Err(info_log) = backend.link_program(program) {
        log::error!("program link failed: {info_log}");
    }

    backend.detach_shader(program, vert);
    backend.detach_shader(program, frag);
    backend.delete_shader(vert);
    backend.delete_shader(frag);
    program
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;

    const VERT: &str = "void main() {}";
    const FRAG: &str = "void main() {}";

    #[test]
    fn test_build_links_and_cleans_up_shaders() {
        let mut backend = MockBackend::new();
        let program = build_program(&mut backend, VERT, FRAG);
        assert!(backend.program(program).linked);
        assert!(backend.program(program).attached.is_empty());
        // Shaders are deleted once the program holds the binaries.
        assert_eq!(backend.live_shaders(), 0);
    }

    #[test]
    fn test_compile_failure_still_returns_a_handle() {
        let mut backend = MockBackend::new();
        backend.fail_compile = true;
        backend.fail_link = true;
        let program = build_program(&mut backend, VERT, FRAG);
        assert!(!backend.program(program).linked);
        assert_eq!(backend.live_shaders(), 0);
    }
}
