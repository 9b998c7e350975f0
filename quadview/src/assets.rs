use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;

const DEFAULT_IMAGE: &[u8] = include_bytes!("../assets/checker.png");

pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub fn load(path: Option<&Path>) -> Result<DecodedImage, AssetError> {
    match path {
        Some(path) => {
            let file = File::open(path)?;
            decode_png(BufReader::new(file))
        }
        None => decode_png(DEFAULT_IMAGE),
    }
}

pub fn decode_png<R: Read>(src: R) -> Result<DecodedImage, AssetError> {
    let decoder = png::Decoder::new(src);

    let mut reader = decoder.read_info()?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != png::BitDepth::Eight {
        return Err(AssetError::UnsupportedBitDepth(info.bit_depth));
    }

    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => expand_rgb(&buf),
        other => return Err(AssetError::UnsupportedColorType(other)),
    };

    Ok(DecodedImage {
        width: info.width,
        height: info.height,
        rgba,
    })
}

fn expand_rgb(rgb: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);

    for pixel in rgb.chunks_exact(3) {
        rgba.extend_from_slice(pixel);
        rgba.push(255);
    }

    rgba
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("could not read image file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode image: {0}")]
    Decode(#[from] png::DecodingError),
    #[error("unsupported color type {0:?}, expected RGB or RGBA")]
    UnsupportedColorType(png::ColorType),
    #[error("unsupported bit depth {0:?}, expected 8")]
    UnsupportedBitDepth(png::BitDepth),
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED_2X2_RGBA: &[u8] = &[
        137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13, 73, 72, 68, 82, 0, 0, 0, 2, 0, 0, 0, 2, 8,
        6, 0, 0, 0, 114, 182, 13, 36, 0, 0, 0, 17, 73, 68, 65, 84, 120, 218, 99, 248, 207, 192,
        240, 31, 132, 25, 96, 12, 0, 71, 202, 7, 249, 26, 182, 241, 169, 0, 0, 0, 0, 73, 69, 78,
        68, 174, 66, 96, 130,
    ];

    const GREEN_2X2_RGB: &[u8] = &[
        137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13, 73, 72, 68, 82, 0, 0, 0, 2, 0, 0, 0, 2, 8,
        2, 0, 0, 0, 253, 212, 154, 115, 0, 0, 0, 15, 73, 68, 65, 84, 120, 218, 99, 96, 248, 207,
        0, 66, 16, 10, 0, 27, 242, 3, 253, 212, 47, 4, 128, 0, 0, 0, 0, 73, 69, 78, 68, 174, 66,
        96, 130,
    ];

    const GRAY_1X1: &[u8] = &[
        137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13, 73, 72, 68, 82, 0, 0, 0, 1, 0, 0, 0, 1, 8,
        0, 0, 0, 0, 58, 126, 155, 85, 0, 0, 0, 10, 73, 68, 65, 84, 120, 218, 99, 104, 0, 0, 0,
        130, 0, 129, 218, 69, 8, 59, 0, 0, 0, 0, 73, 69, 78, 68, 174, 66, 96, 130,
    ];

    #[test]
    fn decodes_solid_red_rgba() {
        let image = decode_png(RED_2X2_RGBA).unwrap();

        assert_eq!(image.width, 2);
        assert_eq!(image.height, 2);
        assert_eq!(image.rgba, [255, 0, 0, 255].repeat(4));
    }

    #[test]
    fn rgb_input_gains_opaque_alpha() {
        let image = decode_png(GREEN_2X2_RGB).unwrap();

        assert_eq!(image.width, 2);
        assert_eq!(image.height, 2);
        assert_eq!(image.rgba, [0, 255, 0, 255].repeat(4));
    }

    #[test]
    fn grayscale_is_rejected() {
        assert!(matches!(
            decode_png(GRAY_1X1),
            Err(AssetError::UnsupportedColorType(png::ColorType::Grayscale))
        ));
    }

    #[test]
    fn truncated_stream_is_an_error() {
        assert!(matches!(
            decode_png(&RED_2X2_RGBA[..20]),
            Err(AssetError::Decode(_))
        ));
    }

    #[test]
    fn bundled_image_decodes() {
        let image = load(None).unwrap();

        assert_eq!(image.width, 256);
        assert_eq!(image.height, 256);
        assert_eq!(image.rgba.len(), 256 * 256 * 4);
    }
}
