//! Community brand colors
//!
//! A community configures exactly eight colors. [`ThemeColors`] holds the
//! full record; [`ThemeColorsUpdate`] is what a settings form submits, with
//! any subset of the fields present.
//!
//! Field names on the wire follow the settings form (`primaryColor`,
//! `backgroundColor`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{parse_hex_color, Color, ColorError};

// =============================================================================
// Defaults
// =============================================================================

/// Shipped default palette
pub mod defaults {
    /// Default primary color (brand violet)
    pub const PRIMARY: &str = "#6E56CF";

    /// Default secondary color
    pub const SECONDARY: &str = "#9E8CFC";

    /// Default body text color
    pub const TEXT: &str = "#1F2937";

    /// Default page background
    pub const BACKGROUND: &str = "#F9FAFB";

    /// Default card surface
    pub const CARD: &str = "#FFFFFF";

    /// Default muted surface
    pub const MUTED: &str = "#F3F4F6";

    /// Default accent color
    pub const ACCENT: &str = "#E9E5FF";

    /// Default border color
    pub const BORDER: &str = "#E5E7EB";
}

// =============================================================================
// Color Fields
// =============================================================================

/// One of the eight configurable color slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorField {
    /// Primary brand color
    Primary,
    /// Secondary brand color
    Secondary,
    /// Body text color
    Text,
    /// Page background
    Background,
    /// Card surface
    Card,
    /// Muted surface
    Muted,
    /// Accent color
    Accent,
    /// Border color
    Border,
}

impl ColorField {
    /// All fields in declaration order
    pub const ALL: [ColorField; 8] = [
        ColorField::Primary,
        ColorField::Secondary,
        ColorField::Text,
        ColorField::Background,
        ColorField::Card,
        ColorField::Muted,
        ColorField::Accent,
        ColorField::Border,
    ];

    /// Short name, as used in `--theme-<name>-color`
    pub fn name(&self) -> &'static str {
        match self {
            ColorField::Primary => "primary",
            ColorField::Secondary => "secondary",
            ColorField::Text => "text",
            ColorField::Background => "background",
            ColorField::Card => "card",
            ColorField::Muted => "muted",
            ColorField::Accent => "accent",
            ColorField::Border => "border",
        }
    }

    /// Settings-form key (e.g. `primaryColor`)
    pub fn key(&self) -> &'static str {
        match self {
            ColorField::Primary => "primaryColor",
            ColorField::Secondary => "secondaryColor",
            ColorField::Text => "textColor",
            ColorField::Background => "backgroundColor",
            ColorField::Card => "cardColor",
            ColorField::Muted => "mutedColor",
            ColorField::Accent => "accentColor",
            ColorField::Border => "borderColor",
        }
    }

    /// Default color for this slot
    pub fn default_color(&self) -> &'static str {
        match self {
            ColorField::Primary => defaults::PRIMARY,
            ColorField::Secondary => defaults::SECONDARY,
            ColorField::Text => defaults::TEXT,
            ColorField::Background => defaults::BACKGROUND,
            ColorField::Card => defaults::CARD,
            ColorField::Muted => defaults::MUTED,
            ColorField::Accent => defaults::ACCENT,
            ColorField::Border => defaults::BORDER,
        }
    }
}

impl fmt::Display for ColorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ColorField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorField::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(s) || field.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown color field: {}", s))
    }
}

// =============================================================================
// Theme Colors
// =============================================================================

/// The eight source colors of a community theme
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    /// Primary brand color
    pub primary_color: Color,
    /// Secondary brand color
    pub secondary_color: Color,
    /// Body text color
    pub text_color: Color,
    /// Page background
    pub background_color: Color,
    /// Card surface
    pub card_color: Color,
    /// Muted surface
    pub muted_color: Color,
    /// Accent color
    pub accent_color: Color,
    /// Border color
    pub border_color: Color,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary_color: defaults::PRIMARY.to_string(),
            secondary_color: defaults::SECONDARY.to_string(),
            text_color: defaults::TEXT.to_string(),
            background_color: defaults::BACKGROUND.to_string(),
            card_color: defaults::CARD.to_string(),
            muted_color: defaults::MUTED.to_string(),
            accent_color: defaults::ACCENT.to_string(),
            border_color: defaults::BORDER.to_string(),
        }
    }
}

impl ThemeColors {
    /// Get the color in a slot
    pub fn get(&self, field: ColorField) -> &str {
        match field {
            ColorField::Primary => &self.primary_color,
            ColorField::Secondary => &self.secondary_color,
            ColorField::Text => &self.text_color,
            ColorField::Background => &self.background_color,
            ColorField::Card => &self.card_color,
            ColorField::Muted => &self.muted_color,
            ColorField::Accent => &self.accent_color,
            ColorField::Border => &self.border_color,
        }
    }

    /// Overwrite the color in a slot
    pub fn set(&mut self, field: ColorField, color: impl Into<Color>) {
        let slot = match field {
            ColorField::Primary => &mut self.primary_color,
            ColorField::Secondary => &mut self.secondary_color,
            ColorField::Text => &mut self.text_color,
            ColorField::Background => &mut self.background_color,
            ColorField::Card => &mut self.card_color,
            ColorField::Muted => &mut self.muted_color,
            ColorField::Accent => &mut self.accent_color,
            ColorField::Border => &mut self.border_color,
        };
        *slot = color.into();
    }

    /// Iterate over `(field, color)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (ColorField, &str)> + '_ {
        ColorField::ALL.into_iter().map(move |field| (field, self.get(field)))
    }

    /// Shallow merge: supplied fields overwrite, the rest are kept
    pub fn merge(&self, update: &ThemeColorsUpdate) -> ThemeColors {
        let mut merged = self.clone();
        for (field, color) in update.supplied() {
            merged.set(field, color);
        }
        merged
    }

    /// Fields whose value does not parse as a hex color
    pub fn invalid_fields(&self) -> Vec<(ColorField, ColorError)> {
        self.iter()
            .filter_map(|(field, color)| parse_hex_color(color).err().map(|err| (field, err)))
            .collect()
    }

    /// Whether every field parses as a hex color
    pub fn is_valid(&self) -> bool {
        self.invalid_fields().is_empty()
    }
}

// =============================================================================
// Partial Updates
// =============================================================================

/// A partial set of theme colors, as submitted by the branding settings form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeColorsUpdate {
    /// Primary brand color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<Color>,
    /// Secondary brand color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<Color>,
    /// Body text color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    /// Page background
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    /// Card surface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_color: Option<Color>,
    /// Muted surface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muted_color: Option<Color>,
    /// Accent color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<Color>,
    /// Border color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
}

impl ThemeColorsUpdate {
    /// Create an empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply one field
    pub fn with(mut self, field: ColorField, color: impl Into<Color>) -> Self {
        *self.slot_mut(field) = Some(color.into());
        self
    }

    /// Get a supplied field
    pub fn get(&self, field: ColorField) -> Option<&str> {
        match field {
            ColorField::Primary => self.primary_color.as_deref(),
            ColorField::Secondary => self.secondary_color.as_deref(),
            ColorField::Text => self.text_color.as_deref(),
            ColorField::Background => self.background_color.as_deref(),
            ColorField::Card => self.card_color.as_deref(),
            ColorField::Muted => self.muted_color.as_deref(),
            ColorField::Accent => self.accent_color.as_deref(),
            ColorField::Border => self.border_color.as_deref(),
        }
    }

    fn slot_mut(&mut self, field: ColorField) -> &mut Option<Color> {
        match field {
            ColorField::Primary => &mut self.primary_color,
            ColorField::Secondary => &mut self.secondary_color,
            ColorField::Text => &mut self.text_color,
            ColorField::Background => &mut self.background_color,
            ColorField::Card => &mut self.card_color,
            ColorField::Muted => &mut self.muted_color,
            ColorField::Accent => &mut self.accent_color,
            ColorField::Border => &mut self.border_color,
        }
    }

    /// Iterate over the supplied `(field, color)` pairs
    pub fn supplied(&self) -> impl Iterator<Item = (ColorField, &str)> + '_ {
        ColorField::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|color| (field, color)))
    }

    /// Whether no field was supplied
    pub fn is_empty(&self) -> bool {
        self.supplied().next().is_none()
    }

    /// Check every supplied field strictly
    pub fn validate(&self) -> Result<(), (ColorField, ColorError)> {
        for (field, color) in self.supplied() {
            parse_hex_color(color).map_err(|err| (field, err))?;
        }
        Ok(())
    }
}

impl From<ThemeColors> for ThemeColorsUpdate {
    fn from(colors: ThemeColors) -> Self {
        Self {
            primary_color: Some(colors.primary_color),
            secondary_color: Some(colors.secondary_color),
            text_color: Some(colors.text_color),
            background_color: Some(colors.background_color),
            card_color: Some(colors.card_color),
            muted_color: Some(colors.muted_color),
            accent_color: Some(colors.accent_color),
            border_color: Some(colors.border_color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // Field Tests
    // ==========================================================================

    #[test]
    fn test_color_field_names() {
        assert_eq!(ColorField::Primary.name(), "primary");
        assert_eq!(ColorField::Background.key(), "backgroundColor");
        assert_eq!(ColorField::Border.to_string(), "borderColor");
    }

    #[test]
    fn test_color_field_from_str() {
        assert_eq!("primary".parse::<ColorField>().unwrap(), ColorField::Primary);
        assert_eq!("mutedColor".parse::<ColorField>().unwrap(), ColorField::Muted);
        assert_eq!("CARD".parse::<ColorField>().unwrap(), ColorField::Card);
        assert!("shadow".parse::<ColorField>().is_err());
    }

    // ==========================================================================
    // Theme Colors Tests
    // ==========================================================================

    #[test]
    fn test_default_colors() {
        let colors = ThemeColors::default();
        assert_eq!(colors.primary_color, "#6E56CF");
        assert_eq!(colors.background_color, "#F9FAFB");
        assert!(colors.is_valid());
        for (field, color) in colors.iter() {
            assert_eq!(color, field.default_color());
        }
    }

    #[test]
    fn test_get_and_set() {
        let mut colors = ThemeColors::default();
        colors.set(ColorField::Accent, "#FFB703");
        assert_eq!(colors.get(ColorField::Accent), "#FFB703");
        assert_eq!(colors.accent_color, "#FFB703");
    }

    #[test]
    fn test_merge_is_shallow() {
        let colors = ThemeColors::default();
        let update = ThemeColorsUpdate::new()
            .with(ColorField::Primary, "#FF0000")
            .with(ColorField::Background, "#0F172A");

        let merged = colors.merge(&update);
        assert_eq!(merged.primary_color, "#FF0000");
        assert_eq!(merged.background_color, "#0F172A");
        assert_eq!(merged.card_color, colors.card_color);
        assert_eq!(merged.border_color, colors.border_color);
        // Source untouched
        assert_eq!(colors.primary_color, "#6E56CF");
    }

    #[test]
    fn test_merge_empty_update_is_identity() {
        let colors = ThemeColors::default();
        assert_eq!(colors.merge(&ThemeColorsUpdate::new()), colors);
    }

    #[test]
    fn test_invalid_fields() {
        let mut colors = ThemeColors::default();
        colors.set(ColorField::Muted, "#FFF");
        colors.set(ColorField::Text, "black");

        let invalid: Vec<ColorField> = colors.invalid_fields().into_iter().map(|(f, _)| f).collect();
        assert_eq!(invalid, vec![ColorField::Text, ColorField::Muted]);
        assert!(!colors.is_valid());
    }

    // ==========================================================================
    // Update Tests
    // ==========================================================================

    #[test]
    fn test_update_supplied() {
        let update = ThemeColorsUpdate::new().with(ColorField::Card, "#111111");
        assert!(!update.is_empty());
        assert_eq!(update.supplied().collect::<Vec<_>>(), vec![(ColorField::Card, "#111111")]);
        assert!(ThemeColorsUpdate::new().is_empty());
    }

    #[test]
    fn test_update_validate() {
        let ok = ThemeColorsUpdate::new().with(ColorField::Primary, "#6e56cf");
        assert!(ok.validate().is_ok());

        let bad = ThemeColorsUpdate::new()
            .with(ColorField::Primary, "#6E56CF")
            .with(ColorField::Border, "#ZZZZZZ");
        let (field, _) = bad.validate().unwrap_err();
        assert_eq!(field, ColorField::Border);

        let bare = ThemeColorsUpdate::new().with(ColorField::Background, "0F172A");
        let (field, _) = bare.validate().unwrap_err();
        assert_eq!(field, ColorField::Background);
    }

    #[test]
    fn test_full_update_replaces_everything() {
        let target = ThemeColors {
            primary_color: "#111111".to_string(),
            secondary_color: "#222222".to_string(),
            text_color: "#333333".to_string(),
            background_color: "#444444".to_string(),
            card_color: "#555555".to_string(),
            muted_color: "#666666".to_string(),
            accent_color: "#777777".to_string(),
            border_color: "#888888".to_string(),
        };
        let merged = ThemeColors::default().merge(&ThemeColorsUpdate::from(target.clone()));
        assert_eq!(merged, target);
    }

    // ==========================================================================
    // Serialization Tests
    // ==========================================================================

    #[test]
    fn test_theme_colors_wire_names() {
        let json = serde_json::to_value(ThemeColors::default()).unwrap();
        assert_eq!(json["primaryColor"], "#6E56CF");
        assert_eq!(json["backgroundColor"], "#F9FAFB");
        assert_eq!(json.as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_update_deserializes_partial() {
        let update: ThemeColorsUpdate =
            serde_json::from_str(r##"{"primaryColor":"#FF0000"}"##).unwrap();
        assert_eq!(update.get(ColorField::Primary), Some("#FF0000"));
        assert_eq!(update.get(ColorField::Background), None);

        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r##"{"primaryColor":"#FF0000"}"##);
    }
}
