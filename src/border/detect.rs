//! Border pixel classification

use image::Rgb;

use super::types::BorderColor;

/// Classifies pixels as border / non-border against a target color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderDetector {
    target: BorderColor,
    tolerance: u8,
}

impl BorderDetector {
    /// Create a detector for `target` with a per-channel `tolerance`
    pub fn new(target: BorderColor, tolerance: u8) -> Self {
        Self { target, tolerance }
    }

    /// Target color
    pub fn target(&self) -> BorderColor {
        self.target
    }

    /// Per-channel tolerance
    pub fn tolerance(&self) -> u8 {
        self.tolerance
    }

    /// Check whether an RGB pixel is border colored
    #[inline]
    pub fn is_border(&self, pixel: &Rgb<u8>) -> bool {
        self.is_border_channels(&pixel.0)
    }

    /// Check raw channel values. Only the first three channels (RGB) are
    /// compared; a trailing alpha channel is ignored.
    #[inline]
    pub fn is_border_channels(&self, channels: &[u8]) -> bool {
        channels.len() >= 3
            && channels
                .iter()
                .zip(self.target.channels())
                .all(|(&value, target)| value.abs_diff(target) <= self.tolerance)
    }
}
