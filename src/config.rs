//! 設定ファイル
//!
//! `~/.config/ontrack/config.json` から大会ソース・参照ワークブック・列スキーマ等を読む。

use crate::error::{OnTrackError, Result};
use ontrack_common::{ColumnSchema, Gender};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 大会・性別ごとの結果ワークブック
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetSource {
    /// 大会コード（例: SUKMA, MIAG）
    pub meet: String,
    pub gender: Gender,
    /// `data_dir` からの相対パス、または絶対パス
    pub path: PathBuf,
}

/// 参照ワークブック（ターゲット表・基準タイム表）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub path: PathBuf,
    pub target_sheet: String,
    pub base_sheet: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ontrack_reference.xlsx"),
            target_sheet: "Target Times".into(),
            base_sheet: "Base Times".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub sources: Vec<MeetSource>,
    pub reference: ReferenceConfig,
    pub columns: ColumnSchema,
    /// 組み込みプリセット名（malaysia / none）
    pub alias_preset: String,
    /// プリセットに上書きするエイリアスJSON
    pub alias_file: Option<PathBuf>,
    /// 外国籍選手リスト（JSON配列 または 1行1名）
    pub foreign_file: Option<PathBuf>,
    pub bind_address: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// 既定の設定ファイル、無ければ組み込みの既定値
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(OnTrackError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| OnTrackError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ontrack").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            sources: Vec::new(),
            reference: ReferenceConfig::default(),
            columns: ColumnSchema::default(),
            alias_preset: "malaysia".into(),
            alias_file: None,
            foreign_file: None,
            bind_address: "127.0.0.1".into(),
            port: 8080,
        }
    }

    /// 大会コード・性別の重複が無いこと、列スキーマが使えること
    pub fn validate(&self) -> Result<()> {
        self.columns.validate()?;

        for (i, source) in self.sources.iter().enumerate() {
            if source.meet.trim().is_empty() {
                return Err(OnTrackError::Config(format!(
                    "sources[{}] の大会コードが空です",
                    i
                )));
            }
            let duplicate = self.sources[..i]
                .iter()
                .any(|s| s.meet.eq_ignore_ascii_case(&source.meet) && s.gender == source.gender);
            if duplicate {
                return Err(OnTrackError::Config(format!(
                    "大会 {} ({}) が重複しています",
                    source.meet, source.gender
                )));
            }
        }
        Ok(())
    }

    /// `data_dir` 基準でパスを解決
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// 設定されている大会コード（出現順・重複なし）
    pub fn meets(&self) -> Vec<String> {
        let mut meets: Vec<String> = Vec::new();
        for source in &self.sources {
            if !meets.iter().any(|m| m.eq_ignore_ascii_case(&source.meet)) {
                meets.push(source.meet.clone());
            }
        }
        meets
    }

    /// 大会・性別で絞り込んだソース（設定順）
    pub fn select_sources(&self, meets: &[String], gender: Option<Gender>) -> Vec<&MeetSource> {
        self.sources
            .iter()
            .filter(|s| meets.is_empty() || meets.iter().any(|m| m.eq_ignore_ascii_case(&s.meet)))
            .filter(|s| gender.map_or(true, |g| g == s.gender))
            .collect()
    }
}
