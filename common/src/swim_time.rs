//! 競技タイムの表現
//!
//! 1/100秒単位の整数で保持し、表示文字列（`58.90`, `1:02.34`）と
//! 秒数（f64）の相互変換を行う。

use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// 競技タイム（1/100秒単位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SwimTime {
    hundredths: u32,
}

impl SwimTime {
    /// 0 は無効なタイムとして扱う
    pub fn from_hundredths(hundredths: u32) -> Option<Self> {
        (hundredths > 0).then_some(Self { hundredths })
    }

    /// 秒数から変換（0以下・非有限値は None）
    pub fn from_seconds(seconds: f64) -> Option<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return None;
        }
        let hundredths = (seconds * 100.0).round();
        if hundredths < 1.0 || hundredths > u32::MAX as f64 {
            return None;
        }
        Self::from_hundredths(hundredths as u32)
    }

    /// 表示文字列をパース
    ///
    /// 受け付ける形式: `ss.hh`, `m:ss.hh`, `h:mm:ss.hh`（小数部は省略可・1〜2桁）
    pub fn parse(text: &str) -> Option<Self> {
        lazy_static::lazy_static! {
            static ref TIME_RE: Regex =
                Regex::new(r"^(?:(?:(\d+):)?(\d+):)?(\d+)(?:\.(\d{1,2}))?$").unwrap();
        }

        let caps = TIME_RE.captures(text.trim())?;
        let hours: u64 = match caps.get(1) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        let minutes: u64 = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        let seconds: u64 = caps[3].parse().ok()?;
        let fraction: u64 = match caps.get(4) {
            Some(m) if m.as_str().len() == 1 => m.as_str().parse::<u64>().ok()? * 10,
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };

        // 分・時の指定がある場合は下位の桁が60未満であること
        if caps.get(2).is_some() && seconds >= 60 {
            return None;
        }
        if caps.get(1).is_some() && minutes >= 60 {
            return None;
        }

        let total = ((hours * 60 + minutes) * 60 + seconds) * 100 + fraction;
        let total = u32::try_from(total).ok()?;
        Self::from_hundredths(total)
    }

    pub fn seconds(&self) -> f64 {
        self.hundredths as f64 / 100.0
    }
}

impl fmt::Display for SwimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fraction = self.hundredths % 100;
        let whole = self.hundredths / 100;
        let seconds = whole % 60;
        let minutes = (whole / 60) % 60;
        let hours = whole / 3600;

        if hours > 0 {
            write!(f, "{}:{:02}:{:02}.{:02}", hours, minutes, seconds, fraction)
        } else if minutes > 0 {
            write!(f, "{}:{:02}.{:02}", minutes, seconds, fraction)
        } else {
            write!(f, "{}.{:02}", seconds, fraction)
        }
    }
}

/// `{ "display": "1:02.34", "seconds": 62.34 }` 形式で出力
impl Serialize for SwimTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SwimTime", 2)?;
        state.serialize_field("display", &self.to_string())?;
        state.serialize_field("seconds", &self.seconds())?;
        state.end()
    }
}
