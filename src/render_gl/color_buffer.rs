pub struct ColorBuffer {
    pub color: [f32; 4],
}

impl ColorBuffer {
    pub fn from_color(r: f32, g: f32, b: f32) -> ColorBuffer {
        ColorBuffer {
            color: [r, g, b, 1.0],
        }
    }

    pub fn set_used(&self, gl: &gl::Gl) {
        let [r, g, b, a] = self.color;
        unsafe {
            gl.ClearColor(r, g, b, a);
        }
    }

    pub fn clear(&self, gl: &gl::Gl) {
        unsafe {
            gl.Clear(gl::COLOR_BUFFER_BIT);
        }
    }
}
