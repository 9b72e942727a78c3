//! Stream Module
//!
//! Binary decoding of compiled table data.
//!
//! ## Responsibilities
//! - Forward-only decoding of primitives from a fully buffered blob
//! - Count-prefixed lists and maps for multi-valued fields
//! - Sub-streams over length-framed table sections
//! - Fixture encoding for tests and benchmarks (`writer`)
//!
//! ## Encoding
//! All integers and floats are little-endian fixed width.
//! ```text
//! bool    ┌────────┐                 string  ┌──────────┬────────────────┐
//!         │ u8 (1) │ nonzero = true          │ Len (4)  │ UTF-8 bytes    │
//!         └────────┘                         └──────────┴────────────────┘
//!
//! list    ┌──────────┬─────────┬─────────┬─────┐
//!         │Count (4) │ item 0  │ item 1  │ ... │
//!         └──────────┴─────────┴─────────┴─────┘
//!
//! map     ┌──────────┬───────┬─────────┬───────┬─────────┬─────┐
//!         │Count (4) │ key 0 │ value 0 │ key 1 │ value 1 │ ... │
//!         └──────────┴───────┴─────────┴───────┴─────────┴─────┘
//! ```
//! Counts and lengths are signed int32; a negative value is malformed.

mod reader;
mod writer;

pub use reader::Stream;
pub use writer::{encode_table, BlobBuilder, StreamWriter};
