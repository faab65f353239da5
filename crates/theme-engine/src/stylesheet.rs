//! Generated override stylesheet
//!
//! Custom properties only reach components that read them. Utility-class
//! markup and third-party widgets hardcode their colors, so on top of the
//! property set the engine emits a stylesheet of override rules:
//!
//! - legacy accent classes (the old brand purple utilities) retargeted at the
//!   configured primary color
//! - on dark backgrounds, a broad legibility layer forcing page, card, table,
//!   form and text colors
//!
//! Rules are plain data ([`OverrideRule`]) rendered by a single function, so
//! each rule set can be inspected and tested on its own.

use std::fmt;

use crate::color::{adjust_brightness, contrast_color, is_color_dark};
use crate::colors::ThemeColors;
use crate::config::EngineConfig;
use crate::palette::factor;

/// A single `property: value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// CSS property
    pub property: String,
    /// CSS value
    pub value: String,
    /// Whether the declaration is marked `!important`
    pub important: bool,
}

/// A selector list with its declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRule {
    /// Selectors, joined with `, ` when rendered
    pub selectors: Vec<String>,
    /// Declarations in order
    pub declarations: Vec<Declaration>,
}

impl OverrideRule {
    /// Start a rule for the given selectors
    pub fn new<S: AsRef<str>>(selectors: &[S]) -> Self {
        Self {
            selectors: selectors.iter().map(|s| s.as_ref().to_string()).collect(),
            declarations: Vec::new(),
        }
    }

    /// Add an `!important` declaration
    pub fn force(mut self, property: &str, value: impl Into<String>) -> Self {
        self.declarations.push(Declaration {
            property: property.to_string(),
            value: value.into(),
            important: true,
        });
        self
    }

    /// Add a plain declaration
    pub fn set(mut self, property: &str, value: impl Into<String>) -> Self {
        self.declarations.push(Declaration {
            property: property.to_string(),
            value: value.into(),
            important: false,
        });
        self
    }

    /// Whether the rule targets `selector`
    pub fn targets(&self, selector: &str) -> bool {
        self.selectors.iter().any(|s| s == selector)
    }

    /// Value of a declared property
    pub fn value_of(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }
}

impl fmt::Display for OverrideRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.selectors.join(", "))?;
        for decl in &self.declarations {
            let important = if decl.important { " !important" } else { "" };
            writeln!(f, "  {}: {}{};", decl.property, decl.value, important)?;
        }
        f.write_str("}")
    }
}

/// An ordered list of override rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    rules: Vec<OverrideRule>,
}

impl Stylesheet {
    /// Create an empty stylesheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rules
    pub fn extend(&mut self, rules: impl IntoIterator<Item = OverrideRule>) {
        self.rules.extend(rules);
    }

    /// Rules in order
    pub fn rules(&self) -> &[OverrideRule] {
        &self.rules
    }

    /// First rule targeting `selector`
    pub fn rule_for(&self, selector: &str) -> Option<&OverrideRule> {
        self.rules.iter().find(|rule| rule.targets(selector))
    }

    /// Whether there are no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Render as stylesheet text
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}", rule)?;
        }
        Ok(())
    }
}

// =============================================================================
// Rule Sets
// =============================================================================

/// Legacy utility classes hardcoded to the old brand purple
pub mod legacy {
    /// Text color classes
    pub const TEXT: &[&str] = &[".text-purple-600", ".text-purple-700", r".text-\[\#6E56CF\]"];

    /// Background color classes
    pub const BACKGROUND: &[&str] = &[".bg-purple-600", r".bg-\[\#6E56CF\]"];

    /// Background hover classes
    pub const HOVER_BACKGROUND: &[&str] =
        &[r".hover\:bg-purple-700:hover", r".hover\:bg-\[\#5B44B8\]:hover"];

    /// Border color classes
    pub const BORDER: &[&str] = &[".border-purple-600", r".border-\[\#6E56CF\]"];

    /// Focus ring classes
    pub const RING: &[&str] = &[r".focus\:ring-purple-500:focus", r".ring-\[\#6E56CF\]"];
}

/// Retarget legacy accent classes at the primary color
pub fn legacy_accent_rules(colors: &ThemeColors) -> Vec<OverrideRule> {
    let primary = colors.primary_color.as_str();
    vec![
        OverrideRule::new(legacy::TEXT).force("color", primary),
        OverrideRule::new(legacy::BACKGROUND)
            .force("background-color", primary)
            .force("color", contrast_color(primary)),
        OverrideRule::new(legacy::HOVER_BACKGROUND)
            .force("background-color", adjust_brightness(primary, factor::PRIMARY_HOVER)),
        OverrideRule::new(legacy::BORDER).force("border-color", primary),
        OverrideRule::new(legacy::RING).force("--tw-ring-color", primary),
    ]
}

/// Legibility overrides for dark backgrounds
pub fn dark_theme_rules(colors: &ThemeColors) -> Vec<OverrideRule> {
    let background = colors.background_color.as_str();
    let card = colors.card_color.as_str();
    let border = colors.border_color.as_str();

    let text = contrast_color(background);
    let secondary_text = adjust_brightness(&text, factor::SECONDARY_TEXT);
    let input_background = adjust_brightness(background, factor::INPUT_BACKGROUND);
    let input_text = contrast_color(&input_background);
    let placeholder = adjust_brightness(&input_text, factor::PLACEHOLDER_TEXT);

    vec![
        OverrideRule::new(&["body", "html"])
            .force("background-color", background)
            .force("color", text.as_str()),
        OverrideRule::new(&[".bg-white", ".bg-card", ".card", ".shadow", ".shadow-sm", ".shadow-md"])
            .force("background-color", card)
            .force("color", contrast_color(card)),
        OverrideRule::new(&[".bg-gray-50", ".bg-gray-100", ".bg-background", ".bg-slate-50"])
            .force("background-color", background),
        OverrideRule::new(&[".min-h-screen", ".container", "main", ".page-container", ".content-wrapper"])
            .force("background-color", background)
            .force("color", text.as_str()),
        OverrideRule::new(&[
            "table",
            "thead",
            "tbody",
            "tr",
            "th",
            "td",
            ".border",
            ".border-gray-100",
            ".border-gray-200",
            ".border-gray-300",
            ".divide-y > *",
        ])
        .force("border-color", border),
        OverrideRule::new(&["input", "select", "textarea"])
            .force("background-color", input_background.as_str())
            .force("color", input_text.as_str())
            .force("border-color", border),
        OverrideRule::new(&["input::placeholder", "textarea::placeholder"]).force("color", placeholder),
        OverrideRule::new(&["h1", "h2", "h3", "h4", "h5", "h6", "label", "p"]).force("color", text.as_str()),
        OverrideRule::new(&[".text-gray-900", ".text-gray-800", ".text-gray-700", ".text-black"])
            .force("color", text.as_str()),
        OverrideRule::new(&[".text-gray-600", ".text-gray-500", ".text-muted-foreground"])
            .force("color", secondary_text),
    ]
}

/// Build the full override stylesheet for a palette
///
/// Legacy accent rules come first (when enabled), followed by the dark-theme
/// layer when the background is dark.
pub fn theme_stylesheet(colors: &ThemeColors, config: &EngineConfig) -> Stylesheet {
    let mut sheet = Stylesheet::new();
    if config.legacy_accent_overrides {
        sheet.extend(legacy_accent_rules(colors));
    }
    if is_color_dark(&colors.background_color) {
        sheet.extend(dark_theme_rules(colors));
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{ColorField, ThemeColorsUpdate};

    fn dark_colors() -> ThemeColors {
        ThemeColors::default().merge(&ThemeColorsUpdate::new().with(ColorField::Background, "#0F172A"))
    }

    // ==========================================================================
    // Rendering Tests
    // ==========================================================================

    #[test]
    fn test_rule_rendering() {
        let rule = OverrideRule::new(&["body", "html"])
            .force("background-color", "#0F172A")
            .set("color", "#FFFFFF");
        assert_eq!(
            rule.to_string(),
            "body, html {\n  background-color: #0F172A !important;\n  color: #FFFFFF;\n}"
        );
    }

    #[test]
    fn test_stylesheet_rendering_separates_rules() {
        let mut sheet = Stylesheet::new();
        sheet.extend([
            OverrideRule::new(&["a"]).set("color", "red"),
            OverrideRule::new(&["b"]).set("color", "blue"),
        ]);
        assert_eq!(sheet.render(), "a {\n  color: red;\n}\n\nb {\n  color: blue;\n}");
        assert_eq!(Stylesheet::new().render(), "");
    }

    #[test]
    fn test_rule_lookup() {
        let rule = OverrideRule::new(&["input", "select"]).force("color", "#000000");
        assert!(rule.targets("select"));
        assert!(!rule.targets("textarea"));
        assert_eq!(rule.value_of("color"), Some("#000000"));
        assert_eq!(rule.value_of("border-color"), None);
    }

    // ==========================================================================
    // Legacy Accent Tests
    // ==========================================================================

    #[test]
    fn test_legacy_rules_track_primary() {
        let colors = ThemeColors::default().merge(&ThemeColorsUpdate::new().with(ColorField::Primary, "#FF0000"));
        let rules = legacy_accent_rules(&colors);

        let text = rules.iter().find(|r| r.targets(".text-purple-600")).unwrap();
        assert_eq!(text.value_of("color"), Some("#FF0000"));

        let bg = rules.iter().find(|r| r.targets(".bg-purple-600")).unwrap();
        assert_eq!(bg.value_of("background-color"), Some("#FF0000"));
        assert_eq!(bg.value_of("color"), Some("#FFFFFF"));

        let hover = rules.iter().find(|r| r.targets(r".hover\:bg-purple-700:hover")).unwrap();
        assert_eq!(hover.value_of("background-color"), Some("#E60000"));
    }

    #[test]
    fn test_legacy_rules_can_be_disabled() {
        let config = EngineConfig::new().legacy_accent_overrides(false);
        assert!(theme_stylesheet(&ThemeColors::default(), &config).is_empty());
    }

    // ==========================================================================
    // Dark Theme Tests
    // ==========================================================================

    #[test]
    fn test_light_theme_has_no_dark_block() {
        let sheet = theme_stylesheet(&ThemeColors::default(), &EngineConfig::default());
        assert!(sheet.rule_for("body").is_none());
        assert!(!sheet.render().contains("body, html"));
        assert!(sheet.rule_for(".text-purple-600").is_some());
    }

    #[test]
    fn test_dark_theme_block() {
        let sheet = theme_stylesheet(&dark_colors(), &EngineConfig::default());
        let css = sheet.render();
        assert!(css.contains("body, html {\n  background-color: #0F172A !important;\n  color: #FFFFFF !important;\n}"));

        let inputs = sheet.rule_for("textarea").unwrap();
        // #0F172A brightened by 1.2
        assert_eq!(inputs.value_of("background-color"), Some("#121C32"));
        assert_eq!(inputs.value_of("color"), Some("#FFFFFF"));

        let headings = sheet.rule_for("h1").unwrap();
        assert_eq!(headings.value_of("color"), Some("#FFFFFF"));

        let muted = sheet.rule_for(".text-gray-500").unwrap();
        assert_eq!(muted.value_of("color"), Some("#CCCCCC"));
    }

    #[test]
    fn test_dark_block_follows_legacy_rules() {
        let sheet = theme_stylesheet(&dark_colors(), &EngineConfig::default());
        let legacy = sheet.rules().iter().position(|r| r.targets(".bg-purple-600")).unwrap();
        let body = sheet.rules().iter().position(|r| r.targets("body")).unwrap();
        assert!(legacy < body);
    }

    #[test]
    fn test_dark_rules_are_all_important() {
        for rule in dark_theme_rules(&dark_colors()) {
            assert!(!rule.declarations.is_empty());
            assert!(rule.declarations.iter().all(|d| d.important), "{rule}");
        }
    }

    #[test]
    fn test_dark_block_uses_literal_colors() {
        let colors = dark_colors().merge(
            &ThemeColorsUpdate::new()
                .with(ColorField::Card, "#1E293B")
                .with(ColorField::Border, "#334155"),
        );
        let rules = dark_theme_rules(&colors);
        let cards = rules.iter().find(|r| r.targets(".bg-white")).unwrap();
        assert_eq!(cards.value_of("background-color"), Some("#1E293B"));
        let tables = rules.iter().find(|r| r.targets("td")).unwrap();
        assert_eq!(tables.value_of("border-color"), Some("#334155"));
    }
}
