//! Rendering surfaces
//!
//! [`ThemeRenderer`] is the seam between palette derivation and whatever
//! presentation layer reads CSS custom properties. [`DocumentSurface`] is an
//! in-memory document: a root custom-property scope plus style elements by
//! id, exportable as CSS text.

use std::collections::BTreeMap;

use thiserror::Error;

/// Rendering errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Surface refused a custom property
    #[error("Cannot set property {name}: {reason}")]
    Property {
        /// Property name
        name: String,
        /// Why it was refused
        reason: String,
    },

    /// Surface refused a stylesheet
    #[error("Cannot replace stylesheet #{id}: {reason}")]
    Stylesheet {
        /// Style element id
        id: String,
        /// Why it was refused
        reason: String,
    },

    /// Surface is gone (e.g. document torn down)
    #[error("Rendering surface unavailable")]
    Unavailable,
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// A presentation layer that accepts theme output
pub trait ThemeRenderer {
    /// Set one custom property on the root scope
    fn set_property(&mut self, name: &str, value: &str) -> Result<()>;

    /// Replace the entire text of the style element with `id`, creating it
    /// if needed
    fn replace_stylesheet(&mut self, id: &str, css: &str) -> Result<()>;
}

impl<R: ThemeRenderer + ?Sized> ThemeRenderer for &mut R {
    fn set_property(&mut self, name: &str, value: &str) -> Result<()> {
        (**self).set_property(name, value)
    }

    fn replace_stylesheet(&mut self, id: &str, css: &str) -> Result<()> {
        (**self).replace_stylesheet(id, css)
    }
}

impl<R: ThemeRenderer + ?Sized> ThemeRenderer for Box<R> {
    fn set_property(&mut self, name: &str, value: &str) -> Result<()> {
        (**self).set_property(name, value)
    }

    fn replace_stylesheet(&mut self, id: &str, css: &str) -> Result<()> {
        (**self).replace_stylesheet(id, css)
    }
}

/// In-memory document surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSurface {
    root: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
}

impl DocumentSurface {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a root custom property
    pub fn property(&self, name: &str) -> Option<&str> {
        self.root.get(name).map(String::as_str)
    }

    /// All root custom properties
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.root
    }

    /// Text of a style element
    pub fn stylesheet(&self, id: &str) -> Option<&str> {
        self.styles.get(id).map(String::as_str)
    }

    /// Number of style elements
    pub fn stylesheet_count(&self) -> usize {
        self.styles.len()
    }

    /// Export the document as CSS: a `:root` block followed by every style
    /// element, each introduced by an id comment
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in &self.root {
            css.push_str(&format!("  {}: {};\n", name, value));
        }
        css.push('}');

        for (id, body) in &self.styles {
            css.push_str(&format!("\n\n/* #{} */\n", id));
            css.push_str(body);
        }
        css.push('\n');
        css
    }
}

impl ThemeRenderer for DocumentSurface {
    fn set_property(&mut self, name: &str, value: &str) -> Result<()> {
        if !name.starts_with("--") {
            return Err(RenderError::Property {
                name: name.to_string(),
                reason: "custom properties must start with --".to_string(),
            });
        }
        self.root.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn replace_stylesheet(&mut self, id: &str, css: &str) -> Result<()> {
        if id.is_empty() {
            return Err(RenderError::Stylesheet {
                id: id.to_string(),
                reason: "empty id".to_string(),
            });
        }
        self.styles.insert(id.to_string(), css.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_property() {
        let mut doc = DocumentSurface::new();
        doc.set_property("--primary", "252 56% 57%").unwrap();
        assert_eq!(doc.property("--primary"), Some("252 56% 57%"));

        doc.set_property("--primary", "0 100% 50%").unwrap();
        assert_eq!(doc.property("--primary"), Some("0 100% 50%"));
        assert_eq!(doc.properties().len(), 1);
    }

    #[test]
    fn test_set_property_requires_prefix() {
        let mut doc = DocumentSurface::new();
        let err = doc.set_property("primary", "0 0% 0%").unwrap_err();
        assert!(matches!(err, RenderError::Property { .. }));
        assert!(doc.properties().is_empty());
    }

    #[test]
    fn test_replace_stylesheet_overwrites() {
        let mut doc = DocumentSurface::new();
        doc.replace_stylesheet("theme", "a { color: red; }").unwrap();
        doc.replace_stylesheet("theme", "b { color: blue; }").unwrap();
        assert_eq!(doc.stylesheet("theme"), Some("b { color: blue; }"));
        assert_eq!(doc.stylesheet_count(), 1);
        assert!(doc.replace_stylesheet("", "x").is_err());
    }

    #[test]
    fn test_to_css() {
        let mut doc = DocumentSurface::new();
        doc.set_property("--b", "2").unwrap();
        doc.set_property("--a", "1").unwrap();
        doc.replace_stylesheet("theme", "p {\n  color: #FFFFFF;\n}").unwrap();

        assert_eq!(
            doc.to_css(),
            ":root {\n  --a: 1;\n  --b: 2;\n}\n\n/* #theme */\np {\n  color: #FFFFFF;\n}\n"
        );
    }

    #[test]
    fn test_renderer_through_mut_ref() {
        fn write<R: ThemeRenderer>(mut renderer: R) {
            renderer.set_property("--x", "1").unwrap();
        }

        let mut doc = DocumentSurface::new();
        write(&mut doc);
        assert_eq!(doc.property("--x"), Some("1"));
    }
}
