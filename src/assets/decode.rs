use std::io::Cursor;

use crate::{
    foundation::error::{CaptionError, CaptionResult},
    render::{composite::premultiply_in_place, surface::Surface},
};

/// Decodes a raster image (format sniffed from the bytes) into a premultiplied surface.
pub fn decode_template(bytes: &[u8]) -> CaptionResult<Surface> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CaptionError::decode(format!("template image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_in_place(&mut rgba8_premul);
    Surface::from_premul_rgba8(width, height, &rgba8_premul)
}

pub fn encode_png(surface: &Surface) -> CaptionResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(
        surface.width(),
        surface.height(),
        surface.to_straight_rgba8(),
    )
    .ok_or_else(|| CaptionError::encode("invalid rgba buffer size"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CaptionError::encode(format!("png: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_raw(width, height, px.repeat((width * height) as usize))
            .unwrap();
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decode_png_dimensions_and_premul() {
        let surface = decode_template(&png_bytes(3, 2, [100, 50, 200, 128])).unwrap();
        assert_eq!((surface.width(), surface.height()), (3, 2));
        assert_eq!(
            surface.pixel(2, 1),
            Some([
                ((100u16 * 128 + 127) / 255) as u8,
                ((50u16 * 128 + 127) / 255) as u8,
                ((200u16 * 128 + 127) / 255) as u8,
                128u8
            ])
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_template(b"\x89PNG but not really").unwrap_err();
        assert!(matches!(err, CaptionError::Decode(_)));
    }

    #[test]
    fn encode_then_decode_keeps_opaque_pixels() {
        let src = decode_template(&png_bytes(4, 4, [12, 34, 56, 255])).unwrap();
        let png = encode_png(&src).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), image::ImageFormat::Png);

        let back = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(back.dimensions(), (4, 4));
        assert_eq!(back.get_pixel(3, 3).0, [12, 34, 56, 255]);
    }
}
