//! Common types for the border module

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Border module error types
#[derive(Debug, Error)]
pub enum BorderError {
    #[error("Invalid border color: {0}")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, BorderError>;

/// Target border color (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct BorderColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BorderColor {
    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an array
    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for BorderColor {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<BorderColor> for [u8; 3] {
    fn from(c: BorderColor) -> Self {
        c.channels()
    }
}

impl fmt::Display for BorderColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for BorderColor {
    type Err = BorderError;

    /// Accepts `#rrggbb`, `rrggbb` or `r,g,b`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || BorderError::InvalidColor(s.to_string());

        if s.contains(',') {
            let parts: Vec<u8> = s
                .split(',')
                .map(|p| p.trim().parse::<u8>().map_err(|_| invalid()))
                .collect::<Result<_>>()?;
            return match parts.as_slice() {
                [r, g, b] => Ok(Self::new(*r, *g, *b)),
                _ => Err(invalid()),
            };
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Crop rectangle in pixel coordinates (right/bottom exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropBounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBounds {
    /// Width of the rectangle
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    /// Height of the rectangle
    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// Whether the rectangle covers the whole image
    pub fn is_full(&self, size: (u32, u32)) -> bool {
        self.left == 0 && self.top == 0 && self.right == size.0 && self.bottom == size.1
    }
}

/// Result of a border crop
#[derive(Debug, Clone)]
pub struct CropResult {
    /// Cropped (or normalized, uncropped) raster
    pub image: RgbImage,
    /// Content rectangle. Covers the whole image when there was no border,
    /// `None` when every pixel is border.
    pub bounds: Option<CropBounds>,
    /// Size before cropping
    pub original_size: (u32, u32),
}

impl CropResult {
    /// Size after cropping
    pub fn cropped_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Whether any border was removed
    pub fn was_cropped(&self) -> bool {
        self.cropped_size() != self.original_size
    }
}
