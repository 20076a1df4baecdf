//! Border Detection & Cropping module
//!
//! Removes a uniformly colored frame from downloaded images.
//!
//! # Features
//!
//! - Per-channel tolerance against a single target color
//! - Independent edge scans (left, right, top, bottom)
//! - Transparent images are flattened over white before classification
//! - Degenerate results fall back to the uncropped raster
//!
//! # Example
//!
//! ```rust,no_run
//! use md_image_localizer::{BorderOptions, Cropper};
//!
//! let options = BorderOptions::builder().tolerance(20).build();
//! let image = image::open("figure.png").unwrap();
//!
//! let result = Cropper::crop(&image, &options.detector());
//! println!("{:?} -> {:?}", result.original_size, result.cropped_size());
//! ```

mod crop;
mod detect;
mod types;

// Re-export public API
pub use crop::Cropper;
pub use detect::BorderDetector;
pub use types::{BorderColor, BorderError, CropBounds, CropResult, Result};

use serde::{Deserialize, Serialize};

// ============================================================
// Constants
// ============================================================

/// Default border color (pink frame)
pub const DEFAULT_BORDER_COLOR: BorderColor = BorderColor::new(246, 175, 170);

/// Default per-channel tolerance
pub const DEFAULT_TOLERANCE: u8 = 30;

// ============================================================
// Options
// ============================================================

/// Border detection options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderOptions {
    /// Border color to remove
    pub color: BorderColor,
    /// Allowed deviation per RGB channel
    pub tolerance: u8,
}

impl Default for BorderOptions {
    fn default() -> Self {
        Self {
            color: DEFAULT_BORDER_COLOR,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl BorderOptions {
    /// Create a new options builder
    pub fn builder() -> BorderOptionsBuilder {
        BorderOptionsBuilder::default()
    }

    /// Exact color match only
    pub fn strict() -> Self {
        Self {
            tolerance: 0,
            ..Default::default()
        }
    }

    /// Build a detector from these options
    pub fn detector(&self) -> BorderDetector {
        BorderDetector::new(self.color, self.tolerance)
    }
}

/// Builder for BorderOptions
#[derive(Debug, Default)]
pub struct BorderOptionsBuilder {
    options: BorderOptions,
}

impl BorderOptionsBuilder {
    /// Set border color
    #[must_use]
    pub fn color(mut self, color: BorderColor) -> Self {
        self.options.color = color;
        self
    }

    /// Set per-channel tolerance
    #[must_use]
    pub fn tolerance(mut self, tolerance: u8) -> Self {
        self.options.tolerance = tolerance;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> BorderOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = BorderOptions::default();
        assert_eq!(opts.color, BorderColor::new(246, 175, 170));
        assert_eq!(opts.tolerance, 30);
    }

    #[test]
    fn test_builder_pattern() {
        let opts = BorderOptions::builder()
            .color(BorderColor::new(255, 0, 255))
            .tolerance(5)
            .build();

        assert_eq!(opts.color, BorderColor::new(255, 0, 255));
        assert_eq!(opts.tolerance, 5);
        assert_eq!(opts.detector().tolerance(), 5);
    }

    #[test]
    fn test_strict_preset() {
        let opts = BorderOptions::strict();
        assert_eq!(opts.tolerance, 0);
        assert_eq!(opts.color, DEFAULT_BORDER_COLOR);
    }

    #[test]
    fn test_color_parse_hex() {
        assert_eq!(
            "#F6AFAA".parse::<BorderColor>().unwrap(),
            BorderColor::new(246, 175, 170)
        );
        assert_eq!(
            "00ff10".parse::<BorderColor>().unwrap(),
            BorderColor::new(0, 255, 16)
        );
    }

    #[test]
    fn test_color_parse_triplet() {
        assert_eq!(
            "246, 175,170".parse::<BorderColor>().unwrap(),
            BorderColor::new(246, 175, 170)
        );
    }

    #[test]
    fn test_color_parse_errors() {
        assert!("#fff".parse::<BorderColor>().is_err());
        assert!("zzzzzz".parse::<BorderColor>().is_err());
        assert!("1,2".parse::<BorderColor>().is_err());
        assert!("1,2,300".parse::<BorderColor>().is_err());

        let err = "nope".parse::<BorderColor>().unwrap_err();
        assert!(err.to_string().contains("Invalid border color"));
    }

    #[test]
    fn test_color_display() {
        assert_eq!(BorderColor::new(246, 175, 170).to_string(), "#f6afaa");
    }

    #[test]
    fn test_options_from_toml() {
        let opts: BorderOptions = toml::from_str("color = [1, 2, 3]\ntolerance = 9").unwrap();
        assert_eq!(opts.color, BorderColor::new(1, 2, 3));
        assert_eq!(opts.tolerance, 9);

        let partial: BorderOptions = toml::from_str("tolerance = 4").unwrap();
        assert_eq!(partial.color, DEFAULT_BORDER_COLOR);
    }
}
