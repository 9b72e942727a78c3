//! Record keys
//!
//! Primary keys are typed per record; multi-column keys are tuples.
//! Unique keys are carried as [`KeyValue`] so one table can index several
//! of them with different column types.

use std::fmt;
use std::hash::Hash;

/// Type usable as a record's primary key
pub trait RecordKey: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static {
    /// Write the key as it appears in load issues
    fn fmt_key(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    fn display(&self) -> KeyDisplay<'_, Self> {
        KeyDisplay(self)
    }
}

/// `Display` adapter over [`RecordKey::fmt_key`]
pub struct KeyDisplay<'a, K: ?Sized>(&'a K);

impl<K: RecordKey> fmt::Display for KeyDisplay<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_key(f)
    }
}

macro_rules! scalar_key {
    ($($ty:ty),*) => {
        $(
            impl RecordKey for $ty {
                fn fmt_key(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(self, f)
                }
            }
        )*
    };
}

scalar_key!(bool, char, i8, i16, i32, i64, u8, u16, u32, u64, String);

macro_rules! tuple_key {
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: RecordKey $(, $rest: RecordKey)*> RecordKey for ($first, $($rest,)*) {
            #[allow(non_snake_case)]
            fn fmt_key(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let ($first, $($rest,)*) = self;
                f.write_str("(")?;
                $first.fmt_key(f)?;
                $(
                    f.write_str(", ")?;
                    $rest.fmt_key(f)?;
                )*
                f.write_str(")")
            }
        }
    };
}

tuple_key!(A, B);
tuple_key!(A, B, C);
tuple_key!(A, B, C, D);

/// Value of a unique key, possibly spanning several columns
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    Bool(bool),
    Int(i64),
    Str(String),
    /// Multi-column key, columns in declaration order
    Tuple(Vec<KeyValue>),
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Bool(v) => write!(f, "{}", v),
            KeyValue::Int(v) => write!(f, "{}", v),
            KeyValue::Str(v) => f.write_str(v),
            KeyValue::Tuple(columns) => {
                f.write_str("(")?;
                for (i, column) in columns.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", column)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl RecordKey for KeyValue {
    fn fmt_key(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<bool> for KeyValue {
    fn from(v: bool) -> Self {
        KeyValue::Bool(v)
    }
}

impl From<i32> for KeyValue {
    fn from(v: i32) -> Self {
        KeyValue::Int(i64::from(v))
    }
}

impl From<i64> for KeyValue {
    fn from(v: i64) -> Self {
        KeyValue::Int(v)
    }
}

impl From<&str> for KeyValue {
    fn from(v: &str) -> Self {
        KeyValue::Str(v.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(v: String) -> Self {
        KeyValue::Str(v)
    }
}

impl<A, B> From<(A, B)> for KeyValue
where
    A: Into<KeyValue>,
    B: Into<KeyValue>,
{
    fn from((a, b): (A, B)) -> Self {
        KeyValue::Tuple(vec![a.into(), b.into()])
    }
}

impl<A, B, C> From<(A, B, C)> for KeyValue
where
    A: Into<KeyValue>,
    B: Into<KeyValue>,
    C: Into<KeyValue>,
{
    fn from((a, b, c): (A, B, C)) -> Self {
        KeyValue::Tuple(vec![a.into(), b.into(), c.into()])
    }
}
