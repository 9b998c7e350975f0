use std::ffi::c_void;
use thiserror::Error;

pub struct Texture2D {
    id: u32,
}

impl Texture2D {
    pub fn new(
        width: u32,
        height: u32,
        data: &[u8],
        format: TextureFormat,
        filter: TextureFilter,
        wrap: TextureWrap,
    ) -> Result<Self, TextureError> {
        let expected = expected_len(width, height, format);
        if data.len() != expected {
            return Err(TextureError::InvalidSrcLength {
                actual: data.len(),
                expected,
            });
        }

        let mut id = 0;

        unsafe {
            gl::GenTextures(1, (&mut id) as *mut u32);
            gl::BindTexture(gl::TEXTURE_2D, id);

            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap.gl_value() as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap.gl_value() as i32);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                filter.gl_value() as i32,
            );
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MAG_FILTER,
                filter.gl_value() as i32,
            );

            if let TextureFormat::Rgb8 = format {
                // 3-byte pixels break the default 4-byte row alignment
                gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            }

            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format.gl_internal() as i32,
                width as i32,
                height as i32,
                0,
                format.gl_format(),
                gl::UNSIGNED_BYTE,
                data.as_ptr() as *const c_void,
            );
        }

        Ok(Self { id })
    }

    pub fn bind(&self, unit: u8) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit as u32);
            gl::BindTexture(gl::TEXTURE_2D, self.id)
        }
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, (&self.id) as *const u32);
        }
    }
}

fn expected_len(width: u32, height: u32, format: TextureFormat) -> usize {
    width as usize * height as usize * format.channels() as usize
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("source data length {actual} does not match {expected} for the given dimensions")]
    InvalidSrcLength { actual: usize, expected: usize },
}

#[derive(Clone, Copy)]
pub enum TextureFormat {
    Rgba8,
    Rgb8,
}

impl TextureFormat {
    pub fn channels(&self) -> u8 {
        match self {
            TextureFormat::Rgba8 => 4,
            TextureFormat::Rgb8 => 3,
        }
    }

    fn gl_internal(&self) -> u32 {
        match self {
            TextureFormat::Rgba8 => gl::RGBA8,
            TextureFormat::Rgb8 => gl::RGB8,
        }
    }

    fn gl_format(&self) -> u32 {
        match self {
            TextureFormat::Rgba8 => gl::RGBA,
            TextureFormat::Rgb8 => gl::RGB,
        }
    }
}

#[derive(Clone, Copy)]
pub enum TextureFilter {
    Linear,
    Nearest,
}

impl TextureFilter {
    fn gl_value(&self) -> u32 {
        match self {
            TextureFilter::Linear => gl::LINEAR,
            TextureFilter::Nearest => gl::NEAREST,
        }
    }
}

#[derive(Clone, Copy)]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
}

impl TextureWrap {
    fn gl_value(&self) -> u32 {
        match self {
            TextureWrap::Repeat => gl::REPEAT,
            TextureWrap::ClampToEdge => gl::CLAMP_TO_EDGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_len_per_format() {
        assert_eq!(expected_len(2, 2, TextureFormat::Rgba8), 16);
        assert_eq!(expected_len(2, 2, TextureFormat::Rgb8), 12);
        assert_eq!(expected_len(300, 200, TextureFormat::Rgba8), 240_000);
    }

    #[test]
    fn short_and_long_buffers_are_rejected() {
        let short = [0_u8; 15];
        let long = [0_u8; 17];

        assert!(matches!(
            Texture2D::new(
                2,
                2,
                &short,
                TextureFormat::Rgba8,
                TextureFilter::Linear,
                TextureWrap::Repeat,
            ),
            Err(TextureError::InvalidSrcLength {
                actual: 15,
                expected: 16
            })
        ));
        assert!(matches!(
            Texture2D::new(
                2,
                2,
                &long,
                TextureFormat::Rgba8,
                TextureFilter::Linear,
                TextureWrap::Repeat,
            ),
            Err(TextureError::InvalidSrcLength {
                actual: 17,
                expected: 16
            })
        ));
    }
}
