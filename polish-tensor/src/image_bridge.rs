//! Conversions between `image` crate buffers and `Tensor`s.
//!
//! Reads always go through a 16-bit-per-channel view so 8-bit and 16-bit
//! PNGs produce identical `f32` samples (the `image` crate upsamples an
//! 8-bit sample `v` to 16 bits as `v * 0x101`, which is exactly the
//! "16-bit view" the spec calls for). Writes clamp to `[0, 1]`, scale by
//! `255.999`, and truncate, matching the original encoder.

use image::{DynamicImage, GrayImage, Rgba, RgbaImage};

use crate::tensor::Tensor;

const MAX_U16: f32 = 65535.0;

/// Builds a 3-channel RGB tensor from a decoded image, discarding alpha.
pub fn rgb_tensor_from_image(img: &DynamicImage) -> Tensor {
    let rgba16 = img.to_rgba16();
    let (width, height) = rgba16.dimensions();
    let mut tensor = Tensor::new(height as usize, width as usize, 3);
    for y in 0..height {
        for x in 0..width {
            let px = rgba16.get_pixel(x, y);
            for (z, &channel) in px.0[..3].iter().enumerate() {
                *tensor.at_mut(y as usize, x as usize, z) = channel as f32 / MAX_U16;
            }
        }
    }
    tensor
}

/// Builds a single-channel grayscale tensor (depth 1) from a decoded image.
pub fn gray_tensor_from_image(img: &DynamicImage) -> Tensor {
    let gray16 = img.to_luma16();
    let (width, height) = gray16.dimensions();
    let mut tensor = Tensor::new(height as usize, width as usize, 1);
    for y in 0..height {
        for x in 0..width {
            let px = gray16.get_pixel(x, y);
            *tensor.at_mut(y as usize, x as usize, 0) = px.0[0] as f32 / MAX_U16;
        }
    }
    tensor
}

/// Converts a 3-channel tensor to an opaque 8-bit RGBA image. Panics if the
/// tensor's depth is not 3 (an internal-consistency condition, never
/// triggered by a correctly built model's final layer).
pub fn image_from_rgb_tensor(tensor: &Tensor) -> RgbaImage {
    assert_eq!(tensor.depth(), 3, "expected exactly 3 output channels");
    let (height, width, _) = tensor.shape();
    let mut img = RgbaImage::new(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            let mut channels = [0u8; 3];
            for (z, out) in channels.iter_mut().enumerate() {
                *out = quantize(tensor.at(y, x, z));
            }
            img.put_pixel(
                x as u32,
                y as u32,
                Rgba([channels[0], channels[1], channels[2], 0xff]),
            );
        }
    }
    img
}

/// Converts a 1-channel tensor to an 8-bit grayscale image (incidence maps).
pub fn image_from_gray_tensor(tensor: &Tensor) -> GrayImage {
    assert_eq!(tensor.depth(), 1, "expected exactly 1 output channel");
    let (height, width, _) = tensor.shape();
    let mut img = GrayImage::new(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            img.put_pixel(x as u32, y as u32, image::Luma([quantize(tensor.at(y, x, 0))]));
        }
    }
    img
}

fn quantize(value: f32) -> u8 {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * 255.999) as u8
}
