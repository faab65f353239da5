//! Palette derivation
//!
//! Maps the eight source colors to the full set of CSS custom properties
//! read by the rest of the UI. Derivation is pure: nothing here touches a
//! rendering surface, see [`crate::renderer`] for that.
//!
//! Properties are produced in dependency order:
//!
//! 1. base tokens and raw `--theme-<name>-color` passthroughs
//! 2. luminance-dependent foregrounds (including toast and sidebar)
//! 3. translucent interactive-state composites
//!
//! The dark-theme stylesheet block is generated afterwards by
//! [`crate::stylesheet`].

use std::collections::BTreeMap;

use crate::color::{adjust_brightness, adjust_opacity, contrast_color, hex_to_hsl, is_color_dark, WHITE};
use crate::colors::{ColorField, ThemeColors};

/// Destructive (danger) color, independent of the palette
pub const DESTRUCTIVE: &str = "#EF4444";

/// Text on destructive surfaces
pub const DESTRUCTIVE_FOREGROUND: &str = WHITE;

/// Brightness factors applied to derived colors
pub mod factor {
    /// Secondary text, darkened from the contrast color
    pub const SECONDARY_TEXT: f64 = 0.8;

    /// Toast description text, darkened from the toast foreground
    pub const TOAST_DESCRIPTION: f64 = 0.85;

    /// Sidebar background, slightly brighter than the page
    pub const SIDEBAR_BACKGROUND: f64 = 1.02;

    /// Form control background in dark themes
    pub const INPUT_BACKGROUND: f64 = 1.2;

    /// Placeholder text inside dark form controls
    pub const PLACEHOLDER_TEXT: f64 = 0.75;

    /// Hover shade for primary-colored surfaces
    pub const PRIMARY_HOVER: f64 = 0.9;
}

/// Opacities of the translucent primary-color composites
pub mod opacity {
    /// Active navigation item background
    pub const ACTIVE_ITEM: f64 = 0.15;

    /// Hovered navigation item background
    pub const HOVER_ITEM: f64 = 0.1;

    /// Hovered item background on emphasized lists
    pub const HOVER_ITEM_STRONG: f64 = 0.2;

    /// Focus ring
    pub const FOCUS_RING: f64 = 0.5;

    /// Pinned item background
    pub const PINNED: f64 = 0.15;
}

/// How a property value is meant to be consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// `"H S% L%"`, read through `hsl(var(--x))`
    Hsl,
    /// `"R G B / a"`, read through `rgb(var(--x))`
    RgbAlpha,
    /// Literal hex color
    Hex,
}

/// A single CSS custom property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssProperty {
    /// Property name, including the `--` prefix
    pub name: String,
    /// Property value
    pub value: String,
    /// Value format
    pub kind: PropertyKind,
}

/// The derived property set for one set of theme colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePalette {
    properties: Vec<CssProperty>,
    dark: bool,
}

impl ThemePalette {
    /// Derive every custom property from the source colors
    pub fn derive(colors: &ThemeColors) -> Self {
        let mut out = PropertyWriter::default();

        let primary = colors.primary_color.as_str();
        let secondary = colors.secondary_color.as_str();
        let background = colors.background_color.as_str();
        let card = colors.card_color.as_str();
        let muted = colors.muted_color.as_str();
        let accent = colors.accent_color.as_str();
        let border = colors.border_color.as_str();

        // Base tokens
        out.hsl("--primary", primary);
        out.hsl("--secondary", secondary);
        out.hsl("--background", background);
        out.hsl("--card", card);
        out.hsl("--popover", card);
        out.hsl("--muted", muted);
        out.hsl("--accent", accent);
        out.hsl("--border", border);
        out.hsl("--input", border);
        out.hsl("--ring", primary);
        out.hsl("--destructive", DESTRUCTIVE);

        for (field, color) in colors.iter() {
            out.hex(format!("--theme-{}-color", field.name()), color);
        }

        // Foregrounds
        let card_text = contrast_color(card);
        let muted_text = adjust_brightness(&contrast_color(muted), factor::SECONDARY_TEXT);
        out.hsl("--foreground", &contrast_color(background));
        out.hsl("--primary-foreground", &contrast_color(primary));
        out.hsl("--secondary-foreground", &contrast_color(secondary));
        out.hsl("--accent-foreground", &contrast_color(accent));
        out.hsl("--card-foreground", &card_text);
        out.hsl("--popover-foreground", &card_text);
        out.hsl("--muted-foreground", &muted_text);
        out.hsl("--destructive-foreground", DESTRUCTIVE_FOREGROUND);

        // Toasts
        out.hsl("--toast-background", card);
        out.hsl("--toast-foreground", &card_text);
        out.hsl("--toast-border", border);
        out.hsl("--toast-title", &card_text);
        out.hsl(
            "--toast-description",
            &adjust_brightness(&card_text, factor::TOAST_DESCRIPTION),
        );
        out.hsl("--toast-destructive-background", DESTRUCTIVE);
        out.hsl("--toast-destructive-foreground", DESTRUCTIVE_FOREGROUND);

        // Sidebar
        let sidebar = adjust_brightness(background, factor::SIDEBAR_BACKGROUND);
        out.hsl("--sidebar-background", &sidebar);
        out.hsl("--sidebar-foreground", &contrast_color(&sidebar));
        out.hsl("--sidebar-muted", muted);
        out.hsl("--sidebar-muted-foreground", &muted_text);
        out.hsl("--sidebar-accent", accent);
        out.hsl("--sidebar-accent-foreground", &contrast_color(accent));
        out.hsl("--sidebar-border", border);
        out.hsl("--sidebar-primary", primary);
        out.hsl("--sidebar-primary-foreground", &contrast_color(primary));
        out.hsl("--sidebar-ring", primary);

        // Interactive states
        out.rgb("--active-item-bg", primary, opacity::ACTIVE_ITEM);
        out.rgb("--hover-item-bg", primary, opacity::HOVER_ITEM);
        out.rgb("--hover-item-bg-strong", primary, opacity::HOVER_ITEM_STRONG);
        out.hsl("--active-icon-color", primary);
        out.hsl("--menu-active-color", primary);
        out.hsl("--tab-active-color", primary);
        out.rgb("--focus-ring-color", primary, opacity::FOCUS_RING);
        out.rgb("--pinned-bg", primary, opacity::PINNED);
        out.hsl("--pinned-color", primary);

        let palette = Self {
            properties: out.properties,
            dark: is_color_dark(background),
        };
        tracing::debug!(
            properties = palette.properties.len(),
            dark = palette.dark,
            "Derived theme palette"
        );
        palette
    }

    /// Properties in derivation order
    pub fn properties(&self) -> &[CssProperty] {
        &self.properties
    }

    /// Look up a property value by name (with `--` prefix)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Whether the background puts the UI into dark mode
    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the palette has no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Property name to value
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.properties
            .iter()
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect()
    }

    /// Raw hex passthrough for a source color
    pub fn passthrough(&self, field: ColorField) -> Option<&str> {
        self.get(&format!("--theme-{}-color", field.name()))
    }
}

#[derive(Default)]
struct PropertyWriter {
    properties: Vec<CssProperty>,
}

impl PropertyWriter {
    fn push(&mut self, name: impl Into<String>, value: String, kind: PropertyKind) {
        self.properties.push(CssProperty { name: name.into(), value, kind });
    }

    fn hsl(&mut self, name: &str, hex: &str) {
        self.push(name, hex_to_hsl(hex), PropertyKind::Hsl);
    }

    fn rgb(&mut self, name: &str, hex: &str, opacity: f64) {
        self.push(name, adjust_opacity(hex, opacity), PropertyKind::RgbAlpha);
    }

    fn hex(&mut self, name: String, hex: &str) {
        self.push(name, hex.to_string(), PropertyKind::Hex);
    }
}
