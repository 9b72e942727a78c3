//! Signin rewards table

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::Result;
use crate::keyed::KeyedList;
use crate::registry::Registry;
use crate::stream::{Stream, StreamWriter};
use crate::table::{Record, Table};

/// One daily sign-in reward row
#[derive(Debug, Clone)]
pub struct DataSignin {
    /// Reward id
    id: i32,
    /// Regular reward: item id → count
    item2count_map: KeyedList<i32, i32>,
    /// VIP reward: item id → count
    vipitem2vipcount_map: KeyedList<i32, i32>,
    /// Minimum VIP level for the VIP reward
    viplevel: i32,
    /// Reward icon
    icon_file: String,
}

impl DataSignin {
    pub fn new(
        id: i32,
        item2count_map: KeyedList<i32, i32>,
        vipitem2vipcount_map: KeyedList<i32, i32>,
        viplevel: i32,
        icon_file: impl Into<String>,
    ) -> Self {
        Self {
            id,
            item2count_map,
            vipitem2vipcount_map,
            viplevel,
            icon_file: icon_file.into(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn item2count_map(&self) -> &KeyedList<i32, i32> {
        &self.item2count_map
    }

    pub fn vipitem2vipcount_map(&self) -> &KeyedList<i32, i32> {
        &self.vipitem2vipcount_map
    }

    pub fn viplevel(&self) -> i32 {
        self.viplevel
    }

    pub fn icon_file(&self) -> &str {
        &self.icon_file
    }

    /// The signin table from the registry's published snapshot
    pub fn table(registry: &Registry) -> Option<Arc<Table<Self>>> {
        registry.table::<Self>()
    }

    /// Encode in the compiled layout (fixtures only)
    pub fn encode(&self, w: &mut StreamWriter) {
        w.write_i32(self.id);
        w.write_map(&self.item2count_map, |w, k| { w.write_i32(*k); }, |w, v| { w.write_i32(*v); });
        w.write_map(&self.vipitem2vipcount_map, |w, k| { w.write_i32(*k); }, |w, v| { w.write_i32(*v); });
        w.write_i32(self.viplevel);
        w.write_str(&self.icon_file);
    }
}

impl Record for DataSignin {
    type Key = i32;

    const TABLE: &'static str = "signin";

    fn key(&self) -> &i32 {
        &self.id
    }

    fn decode(stream: &mut Stream<'_>) -> Result<Self> {
        let id = stream.read_i32()?;
        let item2count_map = stream.read_map(Stream::read_i32, Stream::read_i32)?;
        let vipitem2vipcount_map = stream.read_map(Stream::read_i32, Stream::read_i32)?;
        let viplevel = stream.read_i32()?;
        let icon_file = stream.read_string()?;

        Ok(Self {
            id,
            item2count_map,
            vipitem2vipcount_map,
            viplevel,
            icon_file,
        })
    }
}

// Identity is the primary key alone
impl PartialEq for DataSignin {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DataSignin {}

impl Hash for DataSignin {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for DataSignin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},{},{},{})",
            self.id, self.item2count_map, self.vipitem2vipcount_map, self.viplevel, self.icon_file
        )
    }
}
