use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use imgslot_core::RawInput;
use std::io::Cursor;

/// Gradient PNG so the encoder has something to compress.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 96, 255])
    });
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, 128, (y % 256) as u8])
    }));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .unwrap();
    buffer
}

pub fn png_input(width: u32, height: u32) -> RawInput {
    RawInput::new(create_test_png(width, height), "image/png").with_filename("photo.png")
}

pub fn jpeg_input(width: u32, height: u32) -> RawInput {
    RawInput::new(create_test_jpeg(width, height), "image/jpeg").with_filename("team.jpg")
}
