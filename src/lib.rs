//! # cfgtable
//!
//! Runtime for compiled config tables:
//! - Forward-only binary decoding of table payloads
//! - Keyed tables with O(1) lookup and source row order iteration
//! - Load passes that collect data issues instead of aborting
//! - Atomic snapshot publication for lock-free readers and clean reloads
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Compiled blob (bytes)                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Registry                                   │
//! │        (load pass, reference check, publish)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ per table section
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Stream    │          │ LoadErrors  │
//!   │  (decode)   │          │ (collect)   │
//!   └──────┬──────┘          └─────────────┘
//!          │ records
//!          ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  KeyedList  │ ───────► │  Snapshot   │
//!   │  (Table)    │          │ (ArcSwap)   │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use cfgtable::{tables, Registry};
//!
//! let registry = tables::register_all(Registry::builder()).build()?;
//! let report = registry.initialize_from_path("config.data".as_ref());
//! let _issues = report.into_result(false)?;
//!
//! let signin = tables::DataSignin::table(&registry).expect("loaded");
//! for row in signin.all() {
//!     println!("{}", row);
//! }
//! # Ok::<(), cfgtable::CfgError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod stream;
pub mod keyed;
pub mod report;
pub mod table;
pub mod registry;
pub mod tables;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CfgError, Result};
pub use config::{BlobLayout, Config};
pub use keyed::KeyedList;
pub use registry::{LoadState, Registry, RegistryBuilder, Snapshot};
pub use report::{IssueKind, LoadErrors, LoadIssue, LoadReport};
pub use stream::Stream;
pub use table::{load_table, KeyValue, RecordKey, RefCheck, Record, Table};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of cfgtable
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
