use serde::{Deserialize, Serialize};

/// Floors offered when the office directory cannot be read.
pub const FALLBACK_FLOORS: [i64; 5] = [1, 2, 3, 4, 5];

/// An entry of the office directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Office {
    pub id: i64,
    pub name: String,
    pub floor: i64,
}
