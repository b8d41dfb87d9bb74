//! On Track ターゲットタイム表
//!
//! (性別, 種目ラベル, 年齢) → ターゲットタイム の完全一致ルックアップ。
//! 年齢・種目間の補間は行わない。

use crate::swim_time::SwimTime;
use crate::types::{Event, Gender};
use std::collections::HashMap;

/// ターゲット表のキー
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetKey {
    pub gender: Gender,
    /// `"100 Free"` 形式
    pub event_label: String,
    pub age: u32,
}

impl TargetKey {
    pub fn new(gender: Gender, event: &Event, age: u32) -> Self {
        Self {
            gender,
            event_label: event.label(),
            age,
        }
    }
}

/// ターゲットタイム表
#[derive(Debug, Clone, Default)]
pub struct TargetTable {
    entries: HashMap<TargetKey, SwimTime>,
}

impl TargetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同じキーは後勝ち
    pub fn insert(&mut self, gender: Gender, event: &Event, age: u32, time: SwimTime) {
        self.entries.insert(TargetKey::new(gender, event, age), time);
    }

    pub fn lookup(&self, gender: Gender, event: &Event, age: u32) -> Option<SwimTime> {
        self.lookup_label(gender, &event.label(), age)
    }

    pub fn lookup_label(&self, gender: Gender, event_label: &str, age: u32) -> Option<SwimTime> {
        let key = TargetKey {
            gender,
            event_label: event_label.to_string(),
            age,
        };
        self.entries.get(&key).copied()
    }

    /// 登録されている種目ラベル一覧（ソート済み）
    pub fn event_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .entries
            .keys()
            .map(|k| k.event_label.clone())
            .collect();
        labels.sort();
        labels.dedup();
        labels
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
