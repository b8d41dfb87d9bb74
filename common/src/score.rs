//! ポイントスコア変換
//!
//! 基準タイムとの比の3乗でタイムをポイント化する:
//! `floor(1000 * (base / time)^3)`

use crate::types::{Event, Gender};
use std::collections::HashMap;

/// 基準タイムと同タイムのときのポイント
pub const BASE_POINTS: f64 = 1000.0;

/// 秒数同士からポイントを計算
///
/// `time_seconds` が 0 以下または非有限値の場合は None。
/// 基準より極端に速く、ポイントが `u32` に収まらない場合も None。
pub fn point_score(base_seconds: f64, time_seconds: f64) -> Option<u32> {
    if !base_seconds.is_finite() || base_seconds <= 0.0 {
        return None;
    }
    if !time_seconds.is_finite() || time_seconds <= 0.0 {
        return None;
    }
    let ratio = base_seconds / time_seconds;
    let points = (BASE_POINTS * ratio.powi(3)).floor();
    (points <= u32::MAX as f64).then_some(points as u32)
}

/// 基準タイム表（性別・種目 → 秒）
#[derive(Debug, Clone, Default)]
pub struct BaseTimes {
    entries: HashMap<(Gender, Event), f64>,
}

impl BaseTimes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, gender: Gender, event: Event, seconds: f64) {
        self.entries.insert((gender, event), seconds);
    }

    pub fn get(&self, gender: Gender, event: &Event) -> Option<f64> {
        self.entries.get(&(gender, *event)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
