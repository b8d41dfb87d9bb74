//! 競技結果の型定義
//!
//! CLIとHTTPサーバで共有される型:
//! - RawRow: ワークブックから読み取った1行分の生データ
//! - ResultRow: 正規化・スコア計算後の表示用の行

use crate::swim_time::SwimTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 性別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::M, Gender::F];

    /// シート上の表記ゆれ（Male/Men/Boys 等）を吸収して判定
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "m" | "male" | "men" | "boy" | "boys" | "l" | "lelaki" => Some(Gender::M),
            "f" | "w" | "female" | "women" | "girl" | "girls" | "p" | "perempuan" => {
                Some(Gender::F)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::parse(s).ok_or_else(|| format!("Unknown gender: {}. Use M or F", s))
    }
}

/// 泳法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stroke {
    Free,
    Back,
    Breast,
    Fly,
    IM,
}

impl Stroke {
    pub fn parse(text: &str) -> Option<Self> {
        let key = text
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        match key.as_str() {
            "free" | "freestyle" | "fr" | "fs" | "bebas" => Some(Stroke::Free),
            "back" | "backstroke" | "bk" | "kuak lentang" => Some(Stroke::Back),
            "breast" | "breaststroke" | "br" | "kuak dada" => Some(Stroke::Breast),
            "fly" | "butterfly" | "fl" | "kuak kupu-kupu" => Some(Stroke::Fly),
            "im" | "individual medley" | "medley" | "ind medley" | "ind. medley" => {
                Some(Stroke::IM)
            }
            _ => None,
        }
    }

    /// ターゲット表で使うラベル
    pub fn label(&self) -> &'static str {
        match self {
            Stroke::Free => "Free",
            Stroke::Back => "Back",
            Stroke::Breast => "Breast",
            Stroke::Fly => "Fly",
            Stroke::IM => "IM",
        }
    }
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 種目（距離 + 泳法）
///
/// JSONでは `"100 Free"` 形式のラベル文字列として扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Event {
    pub distance: u32,
    pub stroke: Stroke,
}

impl Event {
    pub fn new(distance: u32, stroke: Stroke) -> Self {
        Self { distance, stroke }
    }

    /// シートの距離列・泳法列から種目を組み立てる
    pub fn from_parts(distance: &str, stroke: &str) -> Option<Self> {
        let distance = parse_distance(distance)?;
        let stroke = Stroke::parse(stroke)?;
        Some(Self { distance, stroke })
    }

    /// `"<distance> <Stroke>"` 形式のラベル
    pub fn label(&self) -> String {
        format!("{} {}", self.distance, self.stroke.label())
    }

    /// ラベルをパース（"100 Free" / "100m Freestyle" など）
    pub fn parse_label(label: &str) -> Option<Self> {
        let label = label.trim();
        let split = label
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(label.len());
        let (distance, stroke) = label.split_at(split);
        let stroke = stroke.trim();
        // "100m Free" の単位 m を泳法名から外す（"Medley" は残す）
        Self::from_parts(distance, stroke).or_else(|| {
            let stripped = stroke.strip_prefix(['m', 'M'])?;
            Self::from_parts(distance, stripped)
        })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.distance, self.stroke.label())
    }
}

impl From<Event> for String {
    fn from(event: Event) -> Self {
        event.label()
    }
}

impl TryFrom<String> for Event {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Event::parse_label(&value).ok_or_else(|| format!("Unknown event: {}", value))
    }
}

impl FromStr for Event {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Event::parse_label(s).ok_or_else(|| format!("Unknown event: {}", s))
    }
}

/// 距離セル（"100", "100m", "100 m", "100.0"）をパース
pub fn parse_distance(text: &str) -> Option<u32> {
    let text = text.trim().trim_end_matches(['m', 'M']).trim();
    if let Ok(value) = text.parse::<u32>() {
        return (value > 0).then_some(value);
    }
    let value = text.parse::<f64>().ok()?;
    if value > 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

/// 日付セルの生値
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawDate {
    /// Excelシリアル値
    Serial(f64),
    /// 文字列セル
    Text(String),
    #[default]
    Empty,
}

/// 行の出所（ファイル・シート・行番号）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowOrigin {
    pub file: String,
    pub sheet: String,
    /// 1始まりのシート行番号
    pub row: usize,
}

/// ワークブックから読み取った1行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub origin: RowOrigin,
    /// 大会コード（ソース設定から）
    pub meet: String,
    /// 性別列が読めない場合に使うソース側の性別
    pub fallback_gender: Option<Gender>,
    pub gender: String,
    pub distance: String,
    pub stroke: String,
    pub name: String,
    pub birthdate: RawDate,
    pub time_text: String,
    pub time_seconds: Option<f64>,
    /// シートに記載されたポイント
    pub score: Option<f64>,
    pub place: Option<u32>,
    pub meet_date: RawDate,
    pub team: String,
}

/// 表示用の結果行
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub gender: Gender,
    pub event: Event,
    /// 表示名（外国籍選手はマーカー付き）
    pub name: String,
    /// 州コード、または解決できなかった所属テキスト
    pub team: String,
    pub team_resolved: bool,
    pub age: u32,
    pub meet: String,
    pub time: SwimTime,
    pub score: Option<u32>,
    pub place: Option<u32>,
    pub target_time: Option<SwimTime>,
    pub target_score: Option<u32>,
    pub difference: Option<i64>,
    pub foreign: bool,
}
