use std::mem;

use crate::render_gl::{ArrayBuffer, ElementArrayBuffer, VertexArray};

#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub clr: [f32; 3],
    pub uv: [f32; 2],
}

const POS_OFFSET: usize = 0;
const CLR_OFFSET: usize = POS_OFFSET + 3 * mem::size_of::<f32>();
const UV_OFFSET: usize = CLR_OFFSET + 3 * mem::size_of::<f32>();

impl Vertex {
    /// Describes the interleaved layout to the bound vertex array:
    /// location 0 position, 1 color, 2 texture coordinate.
    pub fn vertex_attrib_pointers(gl: &gl::Gl) {
        let stride = mem::size_of::<Self>();

        attrib_pointer(gl, stride, 0, 3, POS_OFFSET);
        attrib_pointer(gl, stride, 1, 3, CLR_OFFSET);
        attrib_pointer(gl, stride, 2, 2, UV_OFFSET);
    }
}

fn attrib_pointer(gl: &gl::Gl, stride: usize, location: usize, components: i32, offset: usize) {
    unsafe {
        gl.EnableVertexAttribArray(location as gl::types::GLuint);
        gl.VertexAttribPointer(
            location as gl::types::GLuint,
            components,
            gl::FLOAT,
            gl::FALSE,
            stride as gl::types::GLint,
            offset as *const gl::types::GLvoid,
        );
    }
}

pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex {
        pos: [0.5, 0.5, 0.0],
        clr: [1.0, 0.0, 0.0],
        uv: [1.0, 1.0],
    },
    Vertex {
        pos: [0.5, -0.5, 0.0],
        clr: [0.0, 1.0, 0.0],
        uv: [1.0, 0.0],
    },
    Vertex {
        pos: [-0.5, -0.5, 0.0],
        clr: [0.0, 0.0, 1.0],
        uv: [0.0, 0.0],
    },
    Vertex {
        pos: [-0.5, 0.5, 0.0],
        clr: [1.0, 1.0, 0.0],
        uv: [0.0, 1.0],
    },
];

pub const QUAD_INDICES: [u32; 6] = [
    0, 1, 3, //
    1, 2, 3,
];

/// The static quad geometry. Uploaded once, never modified.
pub struct Quad {
    _vbo: ArrayBuffer,
    _ebo: ElementArrayBuffer,
    vao: VertexArray,
}

impl Quad {
    pub fn new(gl: &gl::Gl) -> Quad {
        let vbo = ArrayBuffer::new(gl);
        let ebo = ElementArrayBuffer::new(gl);
        let vao = VertexArray::new(gl);

        vao.bind();

        vbo.bind();
        vbo.static_draw_data(&QUAD_VERTICES);

        // element binding is recorded in the vao, so it stays bound until the vao is unbound
        ebo.bind();
        ebo.static_draw_data(&QUAD_INDICES);

        Vertex::vertex_attrib_pointers(gl);

        vao.unbind();
        vbo.unbind();
        ebo.unbind();

        Quad {
            _vbo: vbo,
            _ebo: ebo,
            vao,
        }
    }

    /// Issues the single indexed draw; the program must already be in use.
    pub fn render(&self, gl: &gl::Gl) {
        self.vao.bind();
        unsafe {
            gl.DrawElements(
                gl::TRIANGLES,
                QUAD_INDICES.len() as gl::types::GLsizei,
                gl::UNSIGNED_INT,
                ::std::ptr::null(),
            );
        }
        self.vao.unbind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(mem::size_of::<Vertex>(), 8 * mem::size_of::<f32>());
        assert_eq!(CLR_OFFSET, 12);
        assert_eq!(UV_OFFSET, 24);
    }

    #[test]
    fn quad_is_two_triangles_over_four_vertices() {
        assert_eq!(QUAD_VERTICES.len(), 4);
        assert_eq!(QUAD_INDICES.len(), 6);
        assert_eq!(QUAD_INDICES.len() % 3, 0);

        let used: HashSet<u32> = QUAD_INDICES.iter().cloned().collect();
        assert_eq!(used, (0..QUAD_VERTICES.len() as u32).collect::<HashSet<u32>>());
    }

    #[test]
    fn triangles_share_the_diagonal() {
        let first: HashSet<u32> = QUAD_INDICES[..3].iter().cloned().collect();
        let second: HashSet<u32> = QUAD_INDICES[3..].iter().cloned().collect();

        let shared: HashSet<u32> = first.intersection(&second).cloned().collect();
        assert_eq!(shared, [1, 3].iter().cloned().collect::<HashSet<u32>>());
    }

    #[test]
    fn quad_is_centered() {
        let sum = QUAD_VERTICES
            .iter()
            .fold([0.0f32; 2], |acc, v| [acc[0] + v.pos[0], acc[1] + v.pos[1]]);

        assert_eq!(sum, [0.0, 0.0]);
    }
}
