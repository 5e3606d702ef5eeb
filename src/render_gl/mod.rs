mod buffer;
mod color_buffer;
mod hot_program;
mod shader;
mod viewport;

pub use self::buffer::{ArrayBuffer, ElementArrayBuffer, VertexArray};
pub use self::color_buffer::ColorBuffer;
pub use self::hot_program::{HotProgram, Reloadable};
pub use self::shader::{Error, Program, Shader, ShaderPaths, UniformValue};
pub use self::viewport::Viewport;

/// Switches between filled and line polygon rasterization.
pub fn set_wireframe(gl: &gl::Gl, wireframe: bool) {
    let mode = if wireframe { gl::LINE } else { gl::FILL };
    unsafe {
        gl.PolygonMode(gl::FRONT_AND_BACK, mode);
    }
}
