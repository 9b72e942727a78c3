//! Configuration for cfgtable
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Configuration for a [`crate::Registry`]
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Source Configuration
    // -------------------------------------------------------------------------
    /// Blob file read by `Registry::initialize_from_config`
    pub data_path: PathBuf,

    /// How table payloads are framed inside the blob
    pub layout: BlobLayout,

    // -------------------------------------------------------------------------
    // Policy Configuration
    // -------------------------------------------------------------------------
    /// Treat recoverable data issues as a startup failure.
    /// Consulted by callers through `LoadReport::into_result`.
    pub data_errors_fatal: bool,
}

/// Framing of the table payloads inside one blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobLayout {
    /// `tableCount`, then `name + byteLength + payload` per table
    Sectioned,

    /// Payloads back to back in registration order, no headers
    Contiguous,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("config.data"),
            layout: BlobLayout::Sectioned,
            data_errors_fatal: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the blob file path
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_path = path.into();
        self
    }

    /// Set the blob layout
    pub fn layout(mut self, layout: BlobLayout) -> Self {
        self.config.layout = layout;
        self
    }

    /// Make recoverable data issues fatal for the caller
    pub fn data_errors_fatal(mut self, fatal: bool) -> Self {
        self.config.data_errors_fatal = fatal;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
