use crate::geometry::IndexedGeometry;
use crate::program::Program;

/// Callbacks a host surface drives, serially, on the thread owning the GL
/// context. Creation runs at most once per live context; the host stops
/// drawing before the renderer is dropped.
pub trait SurfaceRenderer {
    type Error;

    fn on_surface_created(&mut self) -> Result<(), Self::Error>;
    fn on_surface_resized(&mut self, width: u32, height: u32);
    fn on_draw_frame(&mut self);
}

pub struct GlRenderer {
    current_program: u32,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self { current_program: 0 }
    }

    pub fn bind_program(&mut self, program: &Program) {
        let p_id = program.get_id();
        if self.current_program != p_id {
            unsafe { gl::UseProgram(p_id) }
            self.current_program = p_id;
        }
    }

    pub fn draw_indexed(&mut self, geometry: &IndexedGeometry, program: &Program) {
        self.bind_program(program);

        unsafe {
            gl::BindVertexArray(geometry.vao());
            gl::DrawElements(
                gl::TRIANGLES,
                geometry.index_count() as i32,
                gl::UNSIGNED_SHORT,
                std::ptr::null(),
            );
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe {
            gl::ClearColor(r, g, b, a);
        }
    }

    pub fn clear(&self) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}
