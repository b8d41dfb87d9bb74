//! エイリアス変換モジュール
//!
//! クラブ・所属チームの自由記述を3文字の州コードに正規化する。

use crate::error::Result;
use crate::normalize::normalize_key;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 州コードと別名（組み込みプリセット）
const MALAYSIA_STATES: &[(&str, &[&str])] = &[
    ("JOH", &["johor", "johore", "jhr", "johor bahru"]),
    ("KED", &["kedah", "kdh"]),
    ("KEL", &["kelantan", "ktn"]),
    ("MEL", &["melaka", "malacca", "mlk"]),
    ("NSE", &["negeri sembilan", "n. sembilan", "n sembilan", "ns", "nsn"]),
    ("PAH", &["pahang", "phg"]),
    ("PNG", &["pulau pinang", "penang", "p. pinang", "ppg"]),
    ("PRK", &["perak"]),
    ("PLS", &["perlis"]),
    ("SAB", &["sabah", "sbh"]),
    ("SWK", &["sarawak"]),
    ("SEL", &["selangor", "sgr"]),
    ("TRG", &["terengganu", "trengganu", "tganu"]),
    (
        "WPK",
        &[
            "kuala lumpur",
            "kl",
            "wp kuala lumpur",
            "wpkl",
            "wilayah persekutuan kuala lumpur",
        ],
    ),
    ("LAB", &["labuan", "wp labuan"]),
    ("PUT", &["putrajaya", "wp putrajaya"]),
];

/// 所属の解決結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamResolution {
    /// 州コード、または未解決の元テキスト（trim済み）
    pub team: String,
    pub resolved: bool,
}

/// エイリアス定義
///
/// キーは `normalize_key` 済みの文字列で保持する。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasTable {
    #[serde(default)]
    aliases: HashMap<String, String>,
}

impl AliasTable {
    /// 組み込みプリセットを取得
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "malaysia" | "states" | "msn" => Some(Self::malaysia_preset()),
            "none" | "empty" => Some(Self::default()),
            _ => None,
        }
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    ///
    /// 形式: `{ "aliases": { "Kuala Lumpur": "WPK", ... } }`
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Self = serde_json::from_str(json)?;
        let mut table = Self::default();
        for (alias, code) in raw.aliases {
            table.insert(&alias, &code);
        }
        Ok(table)
    }

    /// マレーシア州プリセット（コード自身も登録）
    fn malaysia_preset() -> Self {
        let mut table = Self::default();
        for (code, aliases) in MALAYSIA_STATES {
            table.insert(code, code);
            for alias in *aliases {
                table.insert(alias, code);
            }
        }
        table
    }

    pub fn insert(&mut self, alias: &str, code: &str) {
        self.aliases
            .insert(normalize_key(alias), code.trim().to_uppercase());
    }

    /// 完全一致（正規化後）でコードを取得
    pub fn lookup(&self, text: &str) -> Option<&str> {
        self.aliases.get(&normalize_key(text)).map(String::as_str)
    }

    /// 所属テキストを解決。未登録ならそのまま返す。
    pub fn resolve(&self, text: &str) -> TeamResolution {
        match self.lookup(text) {
            Some(code) => TeamResolution {
                team: code.to_string(),
                resolved: true,
            },
            None => TeamResolution {
                team: text.trim().to_string(),
                resolved: false,
            },
        }
    }

    /// 設定をマージ（後から追加した設定が優先）
    pub fn merge(&mut self, other: &AliasTable) {
        self.aliases.extend(other.aliases.clone());
    }

    /// 登録されている州コード一覧（ソート済み）
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.aliases.values().cloned().collect();
        codes.sort();
        codes.dedup();
        codes
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
