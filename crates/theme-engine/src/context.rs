//! Theme store and context
//!
//! [`ThemeStore`] owns the current [`ThemeColors`]. [`ThemeContext`] pairs a
//! store with a rendering surface for the lifetime of an application root:
//! created by [`ThemeContext::mount`], which applies the initial palette, and
//! consumed by [`ThemeContext::unmount`], which hands the surface back.
//!
//! Every apply recomputes and rewrites the whole property set and the
//! override stylesheet, so the last apply always wins.

use crate::colors::{ThemeColors, ThemeColorsUpdate};
use crate::config::EngineConfig;
use crate::palette::ThemePalette;
use crate::renderer::ThemeRenderer;
use crate::stylesheet::theme_stylesheet;

// =============================================================================
// Store
// =============================================================================

/// Current theme colors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeStore {
    colors: ThemeColors,
}

impl ThemeStore {
    /// Create a store holding `initial`
    pub fn new(initial: ThemeColors) -> Self {
        Self { colors: initial }
    }

    /// Current colors
    pub fn current(&self) -> &ThemeColors {
        &self.colors
    }

    /// Merge a partial update and return the new state
    pub fn update(&mut self, update: &ThemeColorsUpdate) -> &ThemeColors {
        self.colors = self.colors.merge(update);
        tracing::debug!(
            fields = update.supplied().count(),
            "Merged theme color update"
        );
        &self.colors
    }

    /// Replace every color and return the new state
    pub fn replace(&mut self, colors: ThemeColors) -> &ThemeColors {
        self.colors = colors;
        &self.colors
    }

    /// Restore the shipped default palette
    pub fn reset(&mut self) -> &ThemeColors {
        self.replace(ThemeColors::default())
    }
}

// =============================================================================
// Context
// =============================================================================

/// Summary of one apply pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyReport {
    /// Custom properties written successfully
    pub properties_written: usize,
    /// Surface writes that failed (properties and stylesheet)
    pub failed_writes: usize,
    /// Whether the dark-theme layer was active
    pub dark: bool,
    /// Rules in the generated stylesheet
    pub stylesheet_rules: usize,
}

impl ApplyReport {
    /// Whether every write succeeded
    pub fn is_clean(&self) -> bool {
        self.failed_writes == 0
    }
}

/// Theme state bound to a rendering surface
#[derive(Debug)]
pub struct ThemeContext<R: ThemeRenderer> {
    store: ThemeStore,
    renderer: R,
    config: EngineConfig,
}

impl<R: ThemeRenderer> ThemeContext<R> {
    /// Create a context and apply `initial` to the surface
    pub fn mount(renderer: R, config: EngineConfig, initial: ThemeColors) -> Self {
        let mut context = Self {
            store: ThemeStore::new(initial),
            renderer,
            config,
        };
        context.apply_theme(None);
        context
    }

    /// Mount with the default configuration and palette
    pub fn with_defaults(renderer: R) -> Self {
        Self::mount(renderer, EngineConfig::default(), ThemeColors::default())
    }

    /// Current colors
    pub fn colors(&self) -> &ThemeColors {
        self.store.current()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The rendering surface
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Merge a partial update into the current colors and re-apply
    pub fn update_theme_colors(&mut self, update: ThemeColorsUpdate) -> ApplyReport {
        self.store.update(&update);
        self.apply_theme(None)
    }

    /// Restore the default palette and re-apply
    pub fn reset(&mut self) -> ApplyReport {
        self.store.reset();
        self.apply_theme(None)
    }

    /// Write the palette for `colors` (or the current colors) to the surface
    ///
    /// Explicit colors are rendered without changing the stored state. Write
    /// failures are logged and counted; they never stop the remaining writes.
    pub fn apply_theme(&mut self, colors: Option<&ThemeColors>) -> ApplyReport {
        let colors = match colors {
            Some(colors) => colors,
            None => self.store.current(),
        };
        let palette = ThemePalette::derive(colors);
        let stylesheet = theme_stylesheet(colors, &self.config);

        let mut report = ApplyReport {
            properties_written: 0,
            failed_writes: 0,
            dark: palette.is_dark(),
            stylesheet_rules: stylesheet.rules().len(),
        };

        for property in palette.properties() {
            match self.renderer.set_property(&property.name, &property.value) {
                Ok(()) => report.properties_written += 1,
                Err(err) => {
                    tracing::warn!(property = %property.name, error = %err, "Failed to set theme property");
                    report.failed_writes += 1;
                }
            }
        }

        if let Err(err) = self
            .renderer
            .replace_stylesheet(&self.config.style_element_id, &stylesheet.render())
        {
            tracing::warn!(id = %self.config.style_element_id, error = %err, "Failed to write theme stylesheet");
            report.failed_writes += 1;
        }

        tracing::debug!(
            properties = report.properties_written,
            failed = report.failed_writes,
            dark = report.dark,
            "Applied theme"
        );
        report
    }

    /// Tear down the context and return the surface
    pub fn unmount(self) -> R {
        self.renderer
    }
}
