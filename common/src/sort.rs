//! 結果行のソート
//!
//! 列ごとに既定の方向を持つ安定ソート。値が無い行は方向に関係なく末尾。

use crate::types::ResultRow;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// ソート列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Place,
    Time,
    Score,
    Difference,
    Age,
    Name,
}

impl SortColumn {
    /// 列ごとの既定方向
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortColumn::Place | SortColumn::Time | SortColumn::Age | SortColumn::Name => {
                SortDirection::Asc
            }
            SortColumn::Score | SortColumn::Difference => SortDirection::Desc,
        }
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "place" | "pos" => Ok(SortColumn::Place),
            "time" => Ok(SortColumn::Time),
            "score" | "points" => Ok(SortColumn::Score),
            "difference" | "diff" => Ok(SortColumn::Difference),
            "age" => Ok(SortColumn::Age),
            "name" => Ok(SortColumn::Name),
            _ => Err(format!(
                "Unknown sort column: {}. Use place, time, score, difference, age, or name",
                s
            )),
        }
    }
}

/// ソート方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(format!("Unknown sort direction: {}. Use asc or desc", s)),
        }
    }
}

/// ソート指定（方向省略時は列の既定方向）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    #[serde(default)]
    pub direction: Option<SortDirection>,
}

impl SortSpec {
    pub fn new(column: SortColumn) -> Self {
        Self {
            column,
            direction: None,
        }
    }

    pub fn with_direction(column: SortColumn, direction: SortDirection) -> Self {
        Self {
            column,
            direction: Some(direction),
        }
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
            .unwrap_or_else(|| self.column.default_direction())
    }

    /// 2行を比較
    pub fn compare(&self, a: &ResultRow, b: &ResultRow) -> Ordering {
        let direction = self.direction();
        match self.column {
            SortColumn::Place => compare_optional(a.place, b.place, direction),
            SortColumn::Time => direction.apply(a.time.cmp(&b.time)),
            SortColumn::Score => compare_optional(a.score, b.score, direction),
            SortColumn::Difference => compare_optional(a.difference, b.difference, direction),
            SortColumn::Age => direction.apply(a.age.cmp(&b.age)),
            SortColumn::Name => {
                direction.apply(a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            }
        }
    }
}

impl Default for SortSpec {
    /// 順位の昇順
    fn default() -> Self {
        Self::new(SortColumn::Place)
    }
}

/// 値なしは常に末尾
fn compare_optional<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.cmp(&b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 行をソート（安定）。指定が無ければ順位の昇順。
pub fn sort_rows(rows: &mut [ResultRow], spec: Option<&SortSpec>) {
    let spec = spec.copied().unwrap_or_default();
    rows.sort_by(|a, b| spec.compare(a, b));
}
