//! Color math for community themes
//!
//! Every helper here comes in two flavours:
//!
//! - a strict `try_*` form that returns a [`ColorError`] for malformed input
//! - a lenient form used by palette derivation that never fails, logging a
//!   warning and substituting a fixed fallback instead
//!
//! The lenient forms are what keep a single bad brand color from aborting
//! theme application.
//!
//! # Output formats
//!
//! Two token formats are produced and they are NOT interchangeable:
//!
//! - HSL channel tokens (`"252 56% 57%"`) consumed as `hsl(var(--x))`
//! - RGB composites with alpha (`"110 86 207 / 0.15"`) consumed as
//!   `rgb(var(--x))`

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A color represented as a hex string (e.g., "#6E56CF")
pub type Color = String;

/// HSL token returned when a color cannot be parsed
pub const FALLBACK_HSL: &str = "260 80% 64%";

/// Pure white
pub const WHITE: &str = "#FFFFFF";

/// Pure black
pub const BLACK: &str = "#000000";

/// Luminance at which contrast and dark detection switch over
pub const LUMINANCE_THRESHOLD: f64 = 0.5;

/// Errors produced while parsing hex colors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Wrong number of hex digits
    #[error("Expected 6 hex digits, found {0}")]
    InvalidLength(usize),

    /// Non-hex character in the color, or a missing `#`
    #[error("Invalid hex digit in color: {0:?}")]
    InvalidDigit(String),

    /// Opacity is NaN or infinite
    #[error("Opacity must be a finite number")]
    InvalidOpacity,
}

/// Result type for color operations
pub type Result<T> = std::result::Result<T, ColorError>;

// =============================================================================
// RGB
// =============================================================================

/// An sRGB color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels normalized to [0, 1]
    fn normalized(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }

    /// Encode as an uppercase `#RRGGBB` string
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Weighted luminance of the normalized channels, in [0, 1]
    ///
    /// Uses the Rec. 709 coefficients directly on the gamma-encoded
    /// channels, without linearization.
    pub fn luminance(self) -> f64 {
        let (r, g, b) = self.normalized();
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// Whether this color reads as a dark surface
    pub fn is_dark(self) -> bool {
        self.luminance() < LUMINANCE_THRESHOLD
    }

    /// Legible text color to place on top of this color
    pub fn contrast(self) -> Rgb {
        if self.luminance() <= LUMINANCE_THRESHOLD {
            Rgb::new(255, 255, 255)
        } else {
            Rgb::new(0, 0, 0)
        }
    }

    /// Multiply every channel by `factor`, clamping to [0, 255]
    pub fn scale(self, factor: f64) -> Rgb {
        let channel = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
        Rgb::new(channel(self.r), channel(self.g), channel(self.b))
    }

    /// Convert to HSL with integer degrees and percentages
    pub fn to_hsl(self) -> Hsl {
        let (r, g, b) = self.normalized();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (max + min) / 2.0;

        let (hue, saturation) = if max == min {
            (0.0, 0.0)
        } else {
            let delta = max - min;
            let saturation = if lightness > 0.5 {
                delta / (2.0 - max - min)
            } else {
                delta / (max + min)
            };
            let sector = if max == r {
                (g - b) / delta + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / delta + 2.0
            } else {
                (r - g) / delta + 4.0
            };
            (sector / 6.0, saturation)
        };

        Hsl {
            hue: ((hue * 360.0).round() as u16) % 360,
            saturation: (saturation * 100.0).round() as u8,
            lightness: (lightness * 100.0).round() as u8,
        }
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        parse_hex_color(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// =============================================================================
// HSL
// =============================================================================

/// A rounded HSL color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsl {
    /// Hue in degrees, [0, 360)
    pub hue: u16,
    /// Saturation percent, [0, 100]
    pub saturation: u8,
    /// Lightness percent, [0, 100]
    pub lightness: u8,
}

impl fmt::Display for Hsl {
    /// Formats as the CSS channel token `"H S% L%"`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}% {}%", self.hue, self.saturation, self.lightness)
    }
}

// =============================================================================
// Strict API
// =============================================================================

/// Parse a `#RRGGBB` string, case-insensitive
///
/// The leading `#` is required: the raw value is emitted into CSS
/// unchanged, and bare digits are not a CSS color.
pub fn parse_hex_color(hex: &str) -> Result<Rgb> {
    let digits = hex
        .strip_prefix('#')
        .ok_or_else(|| ColorError::InvalidDigit(hex.to_string()))?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidDigit(hex.to_string()));
    }
    if digits.len() != 6 {
        return Err(ColorError::InvalidLength(digits.len()));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::InvalidDigit(hex.to_string()))
    };
    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Strict form of [`hex_to_hsl`]
pub fn try_hex_to_hsl(hex: &str) -> Result<Hsl> {
    parse_hex_color(hex).map(Rgb::to_hsl)
}

/// Strict form of [`contrast_color`]
pub fn try_contrast_color(hex: &str) -> Result<String> {
    parse_hex_color(hex).map(|rgb| rgb.contrast().to_hex())
}

/// Strict form of [`adjust_brightness`]
pub fn try_adjust_brightness(hex: &str, factor: f64) -> Result<String> {
    parse_hex_color(hex).map(|rgb| rgb.scale(factor).to_hex())
}

/// Strict form of [`adjust_opacity`]
pub fn try_adjust_opacity(hex: &str, opacity: f64) -> Result<String> {
    let rgb = parse_hex_color(hex)?;
    if !opacity.is_finite() {
        return Err(ColorError::InvalidOpacity);
    }
    Ok(format!("{} {} {} / {}", rgb.r, rgb.g, rgb.b, opacity.clamp(0.0, 1.0)))
}

/// Strict form of [`is_color_dark`]
pub fn try_is_color_dark(hex: &str) -> Result<bool> {
    parse_hex_color(hex).map(Rgb::is_dark)
}

// =============================================================================
// Lenient API
// =============================================================================

/// Convert a hex color to an HSL channel token (`"H S% L%"`)
///
/// Returns [`FALLBACK_HSL`] for malformed input.
pub fn hex_to_hsl(hex: &str) -> String {
    match try_hex_to_hsl(hex) {
        Ok(hsl) => hsl.to_string(),
        Err(err) => {
            tracing::warn!(color = hex, error = %err, "hex_to_hsl: using fallback");
            FALLBACK_HSL.to_string()
        }
    }
}

/// Pick [`WHITE`] or [`BLACK`] text for the given background
///
/// Returns the input unchanged when it cannot be parsed.
pub fn contrast_color(hex: &str) -> String {
    try_contrast_color(hex).unwrap_or_else(|err| {
        tracing::warn!(color = hex, error = %err, "contrast_color: returning input");
        hex.to_string()
    })
}

/// Scale a color's channels by `factor` (> 1 lightens, < 1 darkens)
///
/// Output is always uppercase `#RRGGBB`, so a factor of 1.0 returns the
/// input up to ASCII case. Returns the input unchanged when it cannot be
/// parsed.
pub fn adjust_brightness(hex: &str, factor: f64) -> String {
    try_adjust_brightness(hex, factor).unwrap_or_else(|err| {
        tracing::warn!(color = hex, factor, error = %err, "adjust_brightness: returning input");
        hex.to_string()
    })
}

/// Build an `"R G B / opacity"` composite for translucent backgrounds
///
/// Opacity is clamped to [0, 1]. Returns the input unchanged when the
/// color cannot be parsed or the opacity is not finite.
pub fn adjust_opacity(hex: &str, opacity: f64) -> String {
    try_adjust_opacity(hex, opacity).unwrap_or_else(|err| {
        tracing::warn!(color = hex, opacity, error = %err, "adjust_opacity: returning input");
        hex.to_string()
    })
}

/// Whether a background color should switch the UI into dark mode
///
/// Malformed colors are treated as light.
pub fn is_color_dark(hex: &str) -> bool {
    try_is_color_dark(hex).unwrap_or_else(|err| {
        tracing::warn!(color = hex, error = %err, "is_color_dark: assuming light");
        false
    })
}
