use cgmath::{perspective, Deg, Matrix4, SquareMatrix, Vector3};
use thiserror::Error;

use gl_wrapper::geometry::{GeometryBuilder, GeometryError, IndexedGeometry, VertexAttribute};
use gl_wrapper::program::{Program, ProgramBuilder, ProgramError};
use gl_wrapper::renderer::{GlRenderer, SurfaceRenderer};
use gl_wrapper::texture::{Texture2D, TextureError, TextureFilter, TextureFormat, TextureWrap};

use crate::assets::DecodedImage;

const VERTEX_SHADER: &str = include_str!("gl_shaders/quad.vert");
const FRAGMENT_SHADER: &str = include_str!("gl_shaders/quad.frag");

#[rustfmt::skip]
const QUAD_VERTICES: [f32; 12] = [
    1.0, 1.0, 0.0,   // top right
    -1.0, 1.0, 0.0,  // top left
    -1.0, -1.0, 0.0, // bottom left
    1.0, -1.0, 0.0,  // bottom right
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// flipped vertically, image rows run top-down
#[rustfmt::skip]
const QUAD_TEX_COORDS: [f32; 8] = [
    1.0, 0.0,
    0.0, 0.0,
    0.0, 1.0,
    1.0, 1.0,
];

/// Renders one textured quad per frame. The host drives the
/// [`SurfaceRenderer`] callbacks; all GPU resources are acquired in
/// `on_surface_created` and released when the value is dropped with the
/// context still current.
pub struct TexturedQuadRenderer {
    image: Option<DecodedImage>,
    resources: Option<QuadResources>,
    gl: GlRenderer,
    // identity until the first resize
    mvp: Matrix4<f32>,
}

struct QuadResources {
    program: Program,
    geometry: IndexedGeometry,
    texture: Texture2D,
    matrix_location: i32,
    sampler_location: i32,
}

impl TexturedQuadRenderer {
    pub fn new(image: DecodedImage) -> Self {
        Self {
            image: Some(image),
            resources: None,
            gl: GlRenderer::new(),
            mvp: Matrix4::identity(),
        }
    }
}

impl SurfaceRenderer for TexturedQuadRenderer {
    type Error = RendererError;

    fn on_surface_created(&mut self) -> Result<(), RendererError> {
        let image = self.image.take().ok_or(RendererError::AlreadyCreated)?;

        self.gl.set_clear_color(0.0, 0.0, 0.0, 0.0);

        let program = ProgramBuilder::new(VERTEX_SHADER, FRAGMENT_SHADER).build()?;

        let position_location = program.attrib_location("vPosition")?;
        let tex_coord_location = program.attrib_location("a_texCoord")?;
        let matrix_location = program.uniform_location("uMVPMatrix")?;
        let sampler_location = program.uniform_location("s_texture")?;

        let geometry = GeometryBuilder::new(&QUAD_INDICES)
            .with_array(position_location, VertexAttribute::Vec3, &QUAD_VERTICES)
            .with_array(tex_coord_location, VertexAttribute::Vec2, &QUAD_TEX_COORDS)
            .build()?;

        let texture = Texture2D::new(
            image.width,
            image.height,
            &image.rgba,
            TextureFormat::Rgba8,
            TextureFilter::Linear,
            TextureWrap::Repeat,
        )?;

        self.resources = Some(QuadResources {
            program,
            geometry,
            texture,
            matrix_location,
            sampler_location,
        });

        Ok(())
    }

    fn on_surface_resized(&mut self, width: u32, height: u32) {
        self.gl.resize(width, height);
        self.mvp = mvp_for_surface(width, height);
    }

    fn on_draw_frame(&mut self) {
        let resources = match &self.resources {
            Some(v) => v,
            None => return,
        };

        self.gl.clear();

        self.gl.bind_program(&resources.program);
        resources
            .program
            .set_mat4(resources.matrix_location, self.mvp.as_ref());
        resources.program.set_int(resources.sampler_location, 0);

        resources.texture.bind(0);

        self.gl.draw_indexed(&resources.geometry, &resources.program);
    }
}

/// 45° vertical FOV perspective over the surface aspect ratio, with the quad
/// pushed 10 units away from the camera.
pub fn mvp_for_surface(width: u32, height: u32) -> Matrix4<f32> {
    let aspect = width as f32 / height as f32;

    perspective(Deg(45.0), aspect, 0.1, 100.0)
        * Matrix4::from_translation(Vector3::new(0.0, 0.0, -10.0))
}

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("shader program: {0}")]
    Program(#[from] ProgramError),
    #[error("quad geometry: {0}")]
    Geometry(#[from] GeometryError),
    #[error("quad texture: {0}")]
    Texture(#[from] TextureError),
    #[error("surface already created")]
    AlreadyCreated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mvp_is_deterministic() {
        assert_eq!(mvp_for_surface(800, 600), mvp_for_surface(800, 600));
        assert_eq!(mvp_for_surface(1, 1), mvp_for_surface(1, 1));
    }

    #[test]
    fn wider_surface_only_rescales_x() {
        let square = mvp_for_surface(100, 100);
        let wide = mvp_for_surface(200, 100);

        assert_eq!(wide.x.x, square.x.x / 2.0);
        assert_eq!(wide.y, square.y);
        assert_eq!(wide.z, square.z);
        // the translation column does not depend on aspect
        assert_eq!(wide.w, square.w);
    }

    #[test]
    fn matrix_defaults_to_identity_before_resize() {
        let image = DecodedImage {
            width: 1,
            height: 1,
            rgba: vec![255, 0, 0, 255],
        };

        let renderer = TexturedQuadRenderer::new(image);

        assert_eq!(renderer.mvp, Matrix4::identity());
    }

    #[test]
    fn quad_indices_stay_in_vertex_range() {
        let vertices = QUAD_VERTICES.len() / 3;

        assert!(QUAD_INDICES.iter().all(|i| (*i as usize) < vertices));
        assert_eq!(QUAD_TEX_COORDS.len() / 2, vertices);
    }

    #[test]
    fn tex_coords_cover_the_unit_square() {
        for pair in QUAD_TEX_COORDS.chunks_exact(2) {
            assert!((0.0..=1.0).contains(&pair[0]));
            assert!((0.0..=1.0).contains(&pair[1]));
        }
        // top-right corner carries the flip convention
        assert_eq!(&QUAD_TEX_COORDS[0..2], &[1.0, 0.0]);
    }
}
