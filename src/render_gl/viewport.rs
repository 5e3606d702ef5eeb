/// Drawable area in framebuffer pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Viewport {
    pub fn for_window(w: i32, h: i32) -> Viewport {
        Viewport {
            x: 0,
            y: 0,
            w: w.max(0),
            h: h.max(0),
        }
    }

    /// Applies a framebuffer-resize notification. Returns whether the size changed.
    pub fn update_size(&mut self, w: i32, h: i32) -> bool {
        let (w, h) = (w.max(0), h.max(0));
        if (self.w, self.h) == (w, h) {
            return false;
        }
        self.w = w;
        self.h = h;
        true
    }

    pub fn set_used(&self, gl: &gl::Gl) {
        unsafe {
            gl.Viewport(self.x, self.y, self.w, self.h);
        }
    }
}
