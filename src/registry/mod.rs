//! Registry Module
//!
//! Owns the loaded tables and drives load passes.
//!
//! ## Responsibilities
//! - Register table types in a fixed order
//! - Decode a whole blob into a new snapshot off to the side
//! - Validate cross-table references once every table is loaded
//! - Publish the snapshot atomically, only when the pass succeeds
//!
//! ## Load Pass State Machine
//! ```text
//!                  initialize_all
//!   NotLoaded ──────────┐     ┌──────────── Loaded / Failed
//!                       ▼     │
//!                    Loading ─┴─► Loaded   (snapshot published)
//!                             └─► Failed   (previous snapshot kept)
//! ```
//!
//! ## Concurrency Model: Load-then-Read-Many
//!
//! - **Load passes**: serialized by `load_lock`, run on the calling thread
//! - **Reads**: `ArcSwap::load` of the current snapshot, no lock taken
//! - **Reload**: one `ArcSwap::store` for the whole registry, so a reader
//!   sees either every table of the old pass or every table of the new one

mod snapshot;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::config::{BlobLayout, Config};
use crate::error::{CfgError, Result};
use crate::report::{LoadErrors, LoadReport};
use crate::stream::Stream;
use crate::table::{Record, Table};

pub use snapshot::Snapshot;
use snapshot::{AnyTable, TableDef};

/// Lifecycle of the registry's load passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No pass has run yet
    NotLoaded,

    /// A pass is decoding
    Loading,

    /// The last pass succeeded and its snapshot is published
    Loaded,

    /// The last pass failed; the previous snapshot (if any) is still published
    Failed,
}

/// Set of config tables with their published snapshot
pub struct Registry {
    /// Registry configuration
    config: Config,

    /// Registered tables, in load order
    defs: Vec<TableDef>,

    /// Currently published snapshot
    current: ArcSwap<Snapshot>,

    /// State of the most recent pass
    state: Mutex<LoadState>,

    /// Serializes load passes
    load_lock: Mutex<()>,
}

impl Registry {
    /// Create a new registry builder
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Run one load pass over a fully buffered blob.
    ///
    /// Steps:
    /// 1. Decode every table into a new snapshot
    /// 2. Check cross-table references
    /// 3. Publish the snapshot
    ///
    /// A fatal error stops at step 1 and leaves the published snapshot as it was.
    pub fn initialize_all(&self, bytes: &[u8]) -> LoadReport {
        let _pass = self.load_lock.lock();
        *self.state.lock() = LoadState::Loading;

        info!(
            bytes = bytes.len(),
            tables = self.defs.len(),
            layout = ?self.config.layout,
            "Loading config tables"
        );

        let mut errors = LoadErrors::new();
        let mut failed_table = None;

        let decoded = match self.config.layout {
            BlobLayout::Sectioned => self.decode_sectioned(bytes, &mut errors, &mut failed_table),
            BlobLayout::Contiguous => self.decode_contiguous(bytes, &mut errors, &mut failed_table),
        };

        let tables = match decoded {
            Ok(tables) => tables,
            Err(e) => {
                let table = failed_table.unwrap_or("-");
                if e.is_decode_error() {
                    error!(table, error = %e, "Corrupt config data, keeping previous tables");
                } else {
                    error!(table, error = %e, "Config load failed, keeping previous tables");
                }
                *self.state.lock() = LoadState::Failed;
                return LoadReport::failed(errors, e, failed_table.map(str::to_string));
            }
        };

        let generation = self.current.load().generation() + 1;
        let snapshot = Snapshot::new(tables, generation);
        self.check_refs(&snapshot, &mut errors);

        let summary = self
            .defs
            .iter()
            .map(|def| {
                let rows = snapshot.raw(def.name).map_or(0, |t| (def.rows)(&**t));
                (def.name.to_string(), rows)
            })
            .collect();

        // Held across the store: once a reader sees the new generation,
        // state() can no longer return Loading for this pass
        let mut state = self.state.lock();
        self.current.store(Arc::new(snapshot));
        *state = LoadState::Loaded;
        drop(state);

        info!(generation, issues = errors.len(), "Config tables loaded");
        LoadReport::loaded(errors, summary)
    }

    /// Read the whole file, then run `initialize_all` on it
    pub fn initialize_from_path(&self, path: &Path) -> LoadReport {
        match std::fs::read(path) {
            Ok(bytes) => self.initialize_all(&bytes),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read config data");
                let _pass = self.load_lock.lock();
                *self.state.lock() = LoadState::Failed;
                LoadReport::failed(LoadErrors::new(), e.into(), None)
            }
        }
    }

    /// Load from `Config::data_path`
    pub fn initialize_from_config(&self) -> LoadReport {
        self.initialize_from_path(&self.config.data_path)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Table `R` from the published snapshot.
    ///
    /// `None` before the first successful pass or if `R` is not registered.
    pub fn table<R: Record>(&self) -> Option<Arc<Table<R>>> {
        self.current.load().table::<R>()
    }

    /// Pin the published snapshot for several consistent lookups
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    pub fn state(&self) -> LoadState {
        *self.state.lock()
    }

    /// Number of successful passes so far
    pub fn generation(&self) -> u64 {
        self.current.load().generation()
    }

    /// Registered table names, in load order
    pub fn table_names(&self) -> Vec<&'static str> {
        self.defs.iter().map(|def| def.name).collect()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Decoding
    // =========================================================================

    fn find(&self, name: &str) -> Option<&TableDef> {
        self.defs.iter().find(|def| def.name == name)
    }

    /// `tableCount`, then `name + byteLength + payload` per table
    fn decode_sectioned(
        &self,
        bytes: &[u8],
        errors: &mut LoadErrors,
        failed_table: &mut Option<&'static str>,
    ) -> Result<IndexMap<&'static str, AnyTable>> {
        let mut stream = Stream::new(bytes);
        let count = stream.read_count()?;
        let mut loaded: HashMap<&'static str, AnyTable> = HashMap::with_capacity(self.defs.len());

        for _ in 0..count {
            let name = stream.read_str()?;
            let def = self.find(name);
            *failed_table = def.map(|def| def.name);
            let mut section = stream.read_section()?;

            let Some(def) = def else {
                errors.unknown_table(name, section.remaining());
                continue;
            };
            if loaded.contains_key(def.name) {
                errors.duplicate_table(def.name, section.remaining());
                *failed_table = None;
                continue;
            }

            let table = (def.load)(&mut section, errors)?;
            section.expect_end(&format!("table {}", def.name))?;
            *failed_table = None;

            loaded.insert(def.name, table);
        }
        stream.expect_end("last table section")?;

        let mut tables = IndexMap::with_capacity(self.defs.len());
        for def in &self.defs {
            let table = match loaded.remove(def.name) {
                Some(table) => table,
                None => {
                    errors.missing_table(def.name);
                    (def.empty)()
                }
            };
            tables.insert(def.name, table);
        }
        Ok(tables)
    }

    /// Table payloads back to back, in registration order
    fn decode_contiguous(
        &self,
        bytes: &[u8],
        errors: &mut LoadErrors,
        failed_table: &mut Option<&'static str>,
    ) -> Result<IndexMap<&'static str, AnyTable>> {
        let mut stream = Stream::new(bytes);
        let mut tables = IndexMap::with_capacity(self.defs.len());

        for def in &self.defs {
            *failed_table = Some(def.name);
            let table = (def.load)(&mut stream, errors)?;
            tables.insert(def.name, table);
        }
        *failed_table = None;

        stream.expect_end("last table")?;
        Ok(tables)
    }

    /// Second pass over the complete snapshot
    fn check_refs(&self, snapshot: &Snapshot, errors: &mut LoadErrors) {
        let before = errors.len();
        for def in &self.defs {
            if let Some(table) = snapshot.raw(def.name) {
                (def.check_refs)(&**table, snapshot, errors);
            }
        }
        debug!(dangling = errors.len() - before, "Reference check finished");
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("tables", &self.defs)
            .field("state", &self.state())
            .field("generation", &self.generation())
            .finish()
    }
}

/// Builder for Registry
#[derive(Default)]
pub struct RegistryBuilder {
    config: Config,
    defs: Vec<TableDef>,
}

impl RegistryBuilder {
    /// Set the registry configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Register table `R`; tables load in registration order
    pub fn table<R: Record>(mut self) -> Self {
        self.defs.push(TableDef::of::<R>());
        self
    }

    pub fn build(self) -> Result<Registry> {
        for (i, def) in self.defs.iter().enumerate() {
            if self.defs[..i].iter().any(|other| other.name == def.name) {
                return Err(CfgError::Config(format!(
                    "table {} registered twice",
                    def.name
                )));
            }
        }

        Ok(Registry {
            config: self.config,
            defs: self.defs,
            current: ArcSwap::from_pointee(Snapshot::default()),
            state: Mutex::new(LoadState::NotLoaded),
            load_lock: Mutex::new(()),
        })
    }
}
