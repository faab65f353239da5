//! Community branding persistence
//!
//! The theme engine never stores colors itself. This module is the
//! collaborator that does: a [`BrandingRepository`] keeps each community's
//! eight colors, and [`BrandingSettings`] is the settings-surface service
//! that loads, saves and resets them while keeping a [`ThemeContext`] in
//! sync.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use theme_engine::{ColorError, ColorField, ThemeColors, ThemeColorsUpdate, ThemeContext, ThemeRenderer};

use crate::persistence::{JsonDocument, PersistenceConfig, PersistenceError};

/// Branding errors
#[derive(Debug, Error)]
pub enum BrandingError {
    /// Underlying storage failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// A submitted color is not a valid hex color
    #[error("Invalid {field} value {value:?}: {source}")]
    InvalidColor {
        /// Offending field
        field: ColorField,
        /// Submitted value
        value: String,
        /// Parse failure
        #[source]
        source: ColorError,
    },

    /// Repository backed by a remote service rejected the request
    ///
    /// Not produced by the file or in-memory repositories; reserved for
    /// implementations that talk to the community API.
    #[error("Branding backend error: {0}")]
    Backend(String),
}

/// Result type for branding operations
pub type Result<T> = std::result::Result<T, BrandingError>;

/// Storage for per-community theme colors
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrandingRepository: Send + Sync {
    /// Load a community's saved colors, if any
    async fn load_branding(&self, community_id: &str) -> Result<Option<ThemeColors>>;

    /// Save a community's colors, replacing any previous record
    async fn save_branding(&self, community_id: &str, colors: &ThemeColors) -> Result<()>;
}

// =============================================================================
// File Repository
// =============================================================================

/// On-disk layout: every community's colors in one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingDocument {
    /// Colors keyed by community id
    #[serde(default)]
    pub communities: BTreeMap<String, ThemeColors>,
}

/// Branding repository backed by a versioned JSON file
///
/// A document that fails to parse or fails its checksum makes loads return
/// an error. The next save moves it aside to `<file>.corrupt` and starts a
/// fresh document, so a reset can always write the defaults back. A schema
/// version mismatch is never discarded this way.
#[derive(Debug)]
pub struct FileBrandingRepository {
    document: JsonDocument<BrandingDocument>,
    write_lock: Mutex<()>,
}

impl FileBrandingRepository {
    /// Create a repository over the configured file
    pub fn new(config: PersistenceConfig) -> Self {
        Self {
            document: JsonDocument::new(config),
            write_lock: Mutex::new(()),
        }
    }

    /// Communities with saved branding
    pub async fn communities(&self) -> Result<Vec<String>> {
        let document = self.document.load().await?.unwrap_or_default();
        Ok(document.communities.into_keys().collect())
    }
}

#[async_trait]
impl BrandingRepository for FileBrandingRepository {
    async fn load_branding(&self, community_id: &str) -> Result<Option<ThemeColors>> {
        let document = self.document.load().await?.unwrap_or_default();
        Ok(document.communities.get(community_id).cloned())
    }

    async fn save_branding(&self, community_id: &str, colors: &ThemeColors) -> Result<()> {
        // Read-modify-write of the shared document
        let _guard = self.write_lock.lock().await;

        let mut document = match self.document.load().await {
            Ok(document) => document.unwrap_or_default(),
            Err(err @ (PersistenceError::Corruption(_) | PersistenceError::Serialization(_))) => {
                let moved = self.document.quarantine().await?;
                tracing::warn!(
                    error = %err,
                    moved_to = %moved.display(),
                    "Branding document unreadable, starting a new one"
                );
                BrandingDocument::default()
            }
            Err(err) => return Err(err.into()),
        };
        document
            .communities
            .insert(community_id.to_string(), colors.clone());
        self.document.save(&document).await?;
        Ok(())
    }
}

// =============================================================================
// In-Memory Repository
// =============================================================================

/// Branding repository held in memory
#[derive(Debug, Default)]
pub struct InMemoryBrandingRepository {
    records: RwLock<HashMap<String, ThemeColors>>,
}

impl InMemoryBrandingRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of communities with saved branding
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether nothing has been saved
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl BrandingRepository for InMemoryBrandingRepository {
    async fn load_branding(&self, community_id: &str) -> Result<Option<ThemeColors>> {
        Ok(self.records.read().await.get(community_id).cloned())
    }

    async fn save_branding(&self, community_id: &str, colors: &ThemeColors) -> Result<()> {
        self.records
            .write()
            .await
            .insert(community_id.to_string(), colors.clone());
        Ok(())
    }
}

// =============================================================================
// Settings Service
// =============================================================================

/// Branding settings for community owners
pub struct BrandingSettings<B> {
    repository: B,
}

impl<B: BrandingRepository> BrandingSettings<B> {
    /// Create the service over a repository
    pub fn new(repository: B) -> Self {
        Self { repository }
    }

    /// The underlying repository
    pub fn repository(&self) -> &B {
        &self.repository
    }

    /// Apply a community's saved colors, or the defaults if none are saved
    pub async fn load_into<R: ThemeRenderer>(
        &self,
        community_id: &str,
        context: &mut ThemeContext<R>,
    ) -> Result<ThemeColors> {
        let colors = match self.repository.load_branding(community_id).await? {
            Some(colors) => colors,
            None => {
                tracing::info!(community = community_id, "No saved branding, using defaults");
                ThemeColors::default()
            }
        };

        context.update_theme_colors(ThemeColorsUpdate::from(colors.clone()));
        Ok(colors)
    }

    /// Validate, merge, persist and apply a settings update
    ///
    /// Nothing is applied unless the save succeeds.
    pub async fn save<R: ThemeRenderer>(
        &self,
        community_id: &str,
        update: ThemeColorsUpdate,
        context: &mut ThemeContext<R>,
    ) -> Result<ThemeColors> {
        if let Err((field, source)) = update.validate() {
            let value = update.get(field).unwrap_or_default().to_string();
            return Err(BrandingError::InvalidColor { field, value, source });
        }

        let merged = context.colors().merge(&update);
        self.repository.save_branding(community_id, &merged).await?;
        tracing::info!(
            community = community_id,
            fields = update.supplied().count(),
            "Saved community branding"
        );

        context.update_theme_colors(update);
        Ok(merged)
    }

    /// Persist and apply the default palette
    pub async fn reset<R: ThemeRenderer>(
        &self,
        community_id: &str,
        context: &mut ThemeContext<R>,
    ) -> Result<ThemeColors> {
        let defaults = ThemeColors::default();
        self.repository.save_branding(community_id, &defaults).await?;
        tracing::info!(community = community_id, "Reset community branding");

        context.reset();
        Ok(defaults)
    }
}
