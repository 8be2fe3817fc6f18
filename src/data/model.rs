use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

// ---------------------------------------------------------------------------
// Stat – one of the six base stats
// ---------------------------------------------------------------------------

/// A base stat. Declaration order is the canonical axis order used by the
/// radar and parallel-coordinates charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    SpAtk,
    SpDef,
    Speed,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Hp,
        Stat::Attack,
        Stat::Defense,
        Stat::SpAtk,
        Stat::SpDef,
        Stat::Speed,
    ];

    /// Column headers accepted for this stat, preferred spelling first.
    pub fn column_names(self) -> &'static [&'static str] {
        match self {
            Stat::Hp => &["HP"],
            Stat::Attack => &["Attack"],
            Stat::Defense => &["Defense"],
            Stat::SpAtk => &["Sp. Atk", "Sp_Atk"],
            Stat::SpDef => &["Sp. Def", "Sp_Def"],
            Stat::Speed => &["Speed"],
        }
    }

    /// Axis label.
    pub fn label(self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Attack => "Attack",
            Stat::Defense => "Defense",
            Stat::SpAtk => "Sp. Atk",
            Stat::SpDef => "Sp. Def",
            Stat::Speed => "Speed",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// StatLine – the six stat values of one record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub sp_atk: u32,
    pub sp_def: u32,
    pub speed: u32,
}

impl StatLine {
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::SpAtk => self.sp_atk,
            Stat::SpDef => self.sp_def,
            Stat::Speed => self.speed,
        }
    }

    pub fn set(&mut self, stat: Stat, value: u32) {
        match stat {
            Stat::Hp => self.hp = value,
            Stat::Attack => self.attack = value,
            Stat::Defense => self.defense = value,
            Stat::SpAtk => self.sp_atk = value,
            Stat::SpDef => self.sp_def = value,
            Stat::Speed => self.speed = value,
        }
    }

    /// Sum of the six stats, saturating at `u32::MAX`.
    pub fn sum(&self) -> u32 {
        Stat::ALL
            .iter()
            .fold(0u32, |acc, &s| acc.saturating_add(self.get(s)))
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// One creature's normalized attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub type1: String,
    /// Absent for single-typed creatures (never the literal `"None"`).
    pub type2: Option<String>,
    pub stats: StatLine,
    /// Source total; not checked against `stats.sum()`.
    pub total: u32,
    pub generation: u32,
    pub legendary: bool,
}

impl Record {
    pub fn stat(&self, stat: Stat) -> u32 {
        self.stats.get(stat)
    }

    /// Lowercased name, the key search highlighting is compared against.
    pub fn search_key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Secondary type for display, `"None"` when absent.
    pub fn type2_label(&self) -> &str {
        self.type2.as_deref().unwrap_or("None")
    }
}

// ---------------------------------------------------------------------------
// RecordSet – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The normalized dataset with pre-computed category indices.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    /// All records in source order.
    pub records: Vec<Record>,
    /// Distinct `type1` ∪ `type2` values, sorted lexicographically.
    pub types: Vec<String>,
    /// Distinct generations, ascending.
    pub generations: Vec<u32>,
    name_index: HashMap<String, usize>,
}

impl RecordSet {
    /// Build indices, rejecting duplicate names.
    pub fn from_records(records: Vec<Record>) -> Result<Self, DatasetError> {
        let mut types: BTreeSet<String> = BTreeSet::new();
        let mut generations: BTreeSet<u32> = BTreeSet::new();
        let mut name_index: HashMap<String, usize> = HashMap::with_capacity(records.len());

        for (row, rec) in records.iter().enumerate() {
            if let Some(&first_row) = name_index.get(&rec.name) {
                return Err(DatasetError::DuplicateName {
                    name: rec.name.clone(),
                    first_row,
                    row,
                });
            }
            name_index.insert(rec.name.clone(), row);

            types.insert(rec.type1.clone());
            if let Some(t2) = &rec.type2 {
                types.insert(t2.clone());
            }
            generations.insert(rec.generation);
        }

        Ok(RecordSet {
            records,
            types: types.into_iter().collect(),
            generations: generations.into_iter().collect(),
            name_index,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Exact (case-sensitive) lookup by name.
    pub fn get(&self, name: &str) -> Option<&Record> {
        self.name_index.get(name).map(|&i| &self.records[i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }
}
