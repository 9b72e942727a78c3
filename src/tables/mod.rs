//! Generated table accessors
//!
//! One module per compiled table. Each row type implements
//! [`crate::table::Record`] and is registered by [`register_all`] in the
//! order the table compiler lists them.

mod signin;

pub use signin::DataSignin;

use crate::registry::RegistryBuilder;

/// Register every known table
pub fn register_all(builder: RegistryBuilder) -> RegistryBuilder {
    builder.table::<DataSignin>()
}
