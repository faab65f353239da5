//! Theme color engine for the community hub
//!
//! A community configures eight brand colors. This crate derives the full
//! set of CSS custom properties the UI reads from them, generates an
//! override stylesheet (including a legibility layer for dark
//! backgrounds), and writes both to a rendering surface.
//!
//! Derivation is pure ([`ThemePalette::derive`], [`theme_stylesheet`]); the
//! write step goes through the [`ThemeRenderer`] seam so the color math is
//! testable without a document.
//!
//! # Modules
//!
//! - [`color`] - Hex parsing, HSL tokens, contrast, brightness, opacity
//! - [`colors`] - The eight source colors and partial updates
//! - [`palette`] - Custom property derivation
//! - [`stylesheet`] - Override rules and rendering
//! - [`renderer`] - Rendering surfaces
//! - [`context`] - Theme store and context lifecycle
//! - [`config`] - Engine configuration
//!
//! # Example
//!
//! ```rust
//! use theme_engine::{ColorField, DocumentSurface, ThemeColorsUpdate, ThemeContext};
//!
//! let mut context = ThemeContext::with_defaults(DocumentSurface::new());
//! context.update_theme_colors(
//!     ThemeColorsUpdate::new().with(ColorField::Background, "#0F172A"),
//! );
//!
//! let doc = context.renderer();
//! assert_eq!(doc.property("--foreground"), Some("0 0% 100%"));
//! assert!(doc.stylesheet("dynamic-theme-styles").unwrap().contains("body, html"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod color;
pub mod colors;
pub mod config;
pub mod context;
pub mod palette;
pub mod renderer;
pub mod stylesheet;

// Re-export commonly used types
pub use color::{
    adjust_brightness, adjust_opacity, contrast_color, hex_to_hsl, is_color_dark, parse_hex_color,
    Color, ColorError, Hsl, Rgb, FALLBACK_HSL,
};

pub use colors::{defaults, ColorField, ThemeColors, ThemeColorsUpdate};

pub use config::{ConfigError, EngineConfig, DEFAULT_STYLE_ELEMENT_ID};

pub use context::{ApplyReport, ThemeContext, ThemeStore};

pub use palette::{CssProperty, PropertyKind, ThemePalette};

pub use renderer::{DocumentSurface, RenderError, ThemeRenderer};

pub use stylesheet::{
    dark_theme_rules, legacy_accent_rules, theme_stylesheet, Declaration, OverrideRule, Stylesheet,
};
