//! Storage layer for the community hub
//!
//! This crate persists the data the theme engine deliberately does not:
//! each community's brand colors.
//!
//! # Modules
//!
//! - [`persistence`] - Versioned, checksummed JSON documents
//! - [`branding`] - Branding repositories and the branding settings service

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod branding;
pub mod persistence;

pub use branding::{
    BrandingDocument, BrandingError, BrandingRepository, BrandingSettings, FileBrandingRepository,
    InMemoryBrandingRepository,
};
pub use persistence::{JsonDocument, PersistenceConfig, PersistenceError};
