//! Border cropping
//!
//! # Algorithm
//!
//! 1. Normalize the raster to RGB8, compositing transparent images over white
//! 2. Scan columns from the left and right, rows from the top and bottom,
//!    stopping at the first line that holds a non-border pixel
//! 3. Crop to the resulting rectangle, or keep the normalized raster when the
//!    rectangle is empty

use image::{imageops, ColorType, DynamicImage, Rgb, RgbImage};

use super::detect::BorderDetector;
use super::types::{CropBounds, CropResult};

/// Border cropper
pub struct Cropper;

impl Cropper {
    /// Crop a uniform border from a decoded image
    pub fn crop(image: &DynamicImage, detector: &BorderDetector) -> CropResult {
        let rgb = Self::normalize(image);
        Self::crop_rgb(rgb, detector)
    }

    /// Crop a uniform border from an already normalized RGB raster
    pub fn crop_rgb(rgb: RgbImage, detector: &BorderDetector) -> CropResult {
        let original_size = rgb.dimensions();

        match Self::find_bounds(&rgb, detector) {
            Some(bounds) if !bounds.is_full(original_size) => {
                let cropped =
                    imageops::crop_imm(&rgb, bounds.left, bounds.top, bounds.width(), bounds.height())
                        .to_image();
                CropResult {
                    image: cropped,
                    bounds: Some(bounds),
                    original_size,
                }
            }
            Some(bounds) => CropResult {
                image: rgb,
                bounds: Some(bounds),
                original_size,
            },
            None => CropResult {
                image: rgb,
                bounds: None,
                original_size,
            },
        }
    }

    /// Find the content rectangle, `None` if it would be empty
    pub fn find_bounds(rgb: &RgbImage, detector: &BorderDetector) -> Option<CropBounds> {
        let (width, height) = rgb.dimensions();
        let column_has_content =
            |x: u32| (0..height).any(|y| !detector.is_border(rgb.get_pixel(x, y)));
        let row_has_content = |y: u32| (0..width).any(|x| !detector.is_border(rgb.get_pixel(x, y)));

        // Each edge is searched independently; an edge without content keeps
        // the full-image default.
        let left = (0..width).find(|&x| column_has_content(x)).unwrap_or(0);
        let right = (0..width)
            .rev()
            .find(|&x| column_has_content(x))
            .map_or(width, |x| x + 1);
        let top = (0..height).find(|&y| row_has_content(y)).unwrap_or(0);
        let bottom = (0..height)
            .rev()
            .find(|&y| row_has_content(y))
            .map_or(height, |y| y + 1);

        if left < right && top < bottom {
            Some(CropBounds {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    /// Convert any color type to RGB8. Images with RGB + alpha are composited
    /// over opaque white so transparency never reads as border.
    pub fn normalize(image: &DynamicImage) -> RgbImage {
        match image.color() {
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => {
                Self::flatten_on_white(&image.to_rgba8())
            }
            _ => image.to_rgb8(),
        }
    }

    fn flatten_on_white(rgba: &image::RgbaImage) -> RgbImage {
        RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            let blend = |c: u8| -> u8 {
                let a = u32::from(a);
                ((u32::from(c) * a + 255 * (255 - a) + 127) / 255) as u8
            };
            Rgb([blend(r), blend(g), blend(b)])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::BorderColor;
    use image::{LumaA, Rgba, RgbaImage};

    const PINK: Rgb<u8> = Rgb([246, 175, 170]);
    const BLUE: Rgb<u8> = Rgb([20, 40, 200]);

    fn detector() -> BorderDetector {
        BorderDetector::new(BorderColor::new(246, 175, 170), 30)
    }

    /// Content of `inner` color framed by `frame` pixels of border on every side
    fn framed(width: u32, height: u32, frame: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let inside = x >= frame && x < width - frame && y >= frame && y < height - frame;
            if inside {
                Rgb([(x * 7 % 200) as u8, (y * 11 % 200) as u8, 30])
            } else {
                PINK
            }
        })
    }

    #[test]
    fn test_uniform_frame_is_removed() {
        let source = framed(40, 30, 5);
        let result = Cropper::crop(&DynamicImage::ImageRgb8(source.clone()), &detector());

        assert_eq!(result.cropped_size(), (30, 20));
        assert_eq!(result.original_size, (40, 30));
        assert!(result.was_cropped());
        assert_eq!(
            result.bounds,
            Some(CropBounds {
                left: 5,
                top: 5,
                right: 35,
                bottom: 25
            })
        );

        for y in 0..20 {
            for x in 0..30 {
                assert_eq!(result.image.get_pixel(x, y), source.get_pixel(x + 5, y + 5));
            }
        }
    }

    #[test]
    fn test_all_border_returns_original() {
        let source = RgbImage::from_pixel(16, 9, PINK);
        let result = Cropper::crop(&DynamicImage::ImageRgb8(source), &detector());

        assert_eq!(result.cropped_size(), (16, 9));
        assert!(result.bounds.is_none());
        assert!(!result.was_cropped());
    }

    #[test]
    fn test_no_border_is_unchanged() {
        let source = RgbImage::from_pixel(12, 12, BLUE);
        let result = Cropper::crop(&DynamicImage::ImageRgb8(source.clone()), &detector());

        assert_eq!(result.image, source);
        assert!(!result.was_cropped());
        assert_eq!(
            result.bounds,
            Some(CropBounds {
                left: 0,
                top: 0,
                right: 12,
                bottom: 12
            })
        );
    }

    #[test]
    fn test_single_pixel_images() {
        let content = RgbImage::from_pixel(1, 1, BLUE);
        let result = Cropper::crop_rgb(content, &detector());
        assert_eq!(result.cropped_size(), (1, 1));

        let border = RgbImage::from_pixel(1, 1, PINK);
        let result = Cropper::crop_rgb(border, &detector());
        assert_eq!(result.cropped_size(), (1, 1));
        assert!(result.bounds.is_none());
    }

    #[test]
    fn test_asymmetric_border() {
        let source = RgbImage::from_fn(20, 10, |x, y| {
            if (3..17).contains(&x) && (1..8).contains(&y) {
                BLUE
            } else {
                PINK
            }
        });
        let bounds = Cropper::find_bounds(&source, &detector()).unwrap();

        assert_eq!(bounds.left, 3);
        assert_eq!(bounds.right, 17);
        assert_eq!(bounds.top, 1);
        assert_eq!(bounds.bottom, 8);
    }

    #[test]
    fn test_near_border_color_within_tolerance_is_cropped() {
        let source = RgbImage::from_fn(10, 10, |x, y| {
            if (2..8).contains(&x) && (2..8).contains(&y) {
                BLUE
            } else if (x + y) % 2 == 0 {
                Rgb([240, 180, 160])
            } else {
                PINK
            }
        });
        let result = Cropper::crop_rgb(source, &detector());
        assert_eq!(result.cropped_size(), (6, 6));
    }

    #[test]
    fn test_scattered_content_bounds() {
        // Two isolated content pixels define the rectangle between them
        let mut source = RgbImage::from_pixel(10, 10, PINK);
        source.put_pixel(2, 7, BLUE);
        source.put_pixel(6, 3, BLUE);

        let bounds = Cropper::find_bounds(&source, &detector()).unwrap();
        assert_eq!(
            bounds,
            CropBounds {
                left: 2,
                top: 3,
                right: 7,
                bottom: 8
            }
        );
    }

    #[test]
    fn test_transparent_pixels_become_white() {
        let mut rgba = RgbaImage::from_pixel(8, 8, Rgba([246, 175, 170, 255]));
        for y in 2..6 {
            for x in 2..6 {
                rgba.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
        let result = Cropper::crop(&DynamicImage::ImageRgba8(rgba), &detector());

        assert_eq!(result.cropped_size(), (4, 4));
        assert_eq!(*result.image.get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_fully_transparent_image_is_not_cropped() {
        let rgba = RgbaImage::from_pixel(5, 5, Rgba([246, 175, 170, 0]));
        let result = Cropper::crop(&DynamicImage::ImageRgba8(rgba), &detector());

        // Flattened to white, which is content
        assert_eq!(result.cropped_size(), (5, 5));
        assert_eq!(*result.image.get_pixel(2, 2), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_half_alpha_blend() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let rgb = Cropper::normalize(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(*rgb.get_pixel(0, 0), Rgb([127, 127, 127]));
    }

    #[test]
    fn test_grayscale_alpha_is_converted() {
        let la = image::ImageBuffer::from_pixel(3, 2, LumaA([200u8, 0]));
        let rgb = Cropper::normalize(&DynamicImage::ImageLumaA8(la));

        assert_eq!(rgb.dimensions(), (3, 2));
        assert_eq!(*rgb.get_pixel(0, 0), Rgb([200, 200, 200]));
    }
}
