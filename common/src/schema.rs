//! 列スキーマ
//!
//! 意味フィールド → 列（0始まりの列番号、またはヘッダー名）の対応を設定で持ち、
//! 設定読み込み時に形を、シート読み込み時にヘッダー行との対応を検証する。
//! 必須列が無ければ即エラー。
//!
//! 設定に書いたフィールドだけが既定レイアウト（A〜K列）を上書きする。
//! `null` を書いたフィールドは列なしになる。

use crate::error::{Error, Result};
use crate::normalize::normalize_key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 結果シートの意味フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Gender,
    Distance,
    Stroke,
    Name,
    Birthdate,
    Time,
    TimeSeconds,
    Score,
    Place,
    MeetDate,
    Team,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Gender,
        Field::Distance,
        Field::Stroke,
        Field::Name,
        Field::Birthdate,
        Field::Time,
        Field::TimeSeconds,
        Field::Score,
        Field::Place,
        Field::MeetDate,
        Field::Team,
    ];

    pub fn is_required(&self) -> bool {
        !matches!(self, Field::TimeSeconds | Field::Score | Field::Place)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Gender => "gender",
            Field::Distance => "distance",
            Field::Stroke => "stroke",
            Field::Name => "name",
            Field::Birthdate => "birthdate",
            Field::Time => "time",
            Field::TimeSeconds => "time_seconds",
            Field::Score => "score",
            Field::Place => "place",
            Field::MeetDate => "meet_date",
            Field::Team => "team",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 列の指定方法
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    /// 0始まりの列番号
    Index(usize),
    /// ヘッダー名（大文字小文字・空白の差は無視）
    Header(String),
}

/// 結果シートの列スキーマ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColumnOverrides")]
pub struct ColumnSchema {
    /// データ前のヘッダー行数。ヘッダー名は最終ヘッダー行から探す。
    pub header_rows: usize,
    pub columns: BTreeMap<Field, ColumnRef>,
}

impl Default for ColumnSchema {
    /// 固定レイアウト A〜K 列
    fn default() -> Self {
        let columns = Field::ALL
            .iter()
            .enumerate()
            .map(|(i, field)| (*field, ColumnRef::Index(i)))
            .collect();
        Self {
            header_rows: 1,
            columns,
        }
    }
}

/// 設定ファイル上の列スキーマ（省略した項目は既定のまま）
#[derive(Deserialize)]
struct ColumnOverrides {
    header_rows: Option<usize>,
    #[serde(default)]
    columns: BTreeMap<Field, Option<ColumnRef>>,
}

impl From<ColumnOverrides> for ColumnSchema {
    fn from(overrides: ColumnOverrides) -> Self {
        let mut schema = ColumnSchema::default();
        if let Some(header_rows) = overrides.header_rows {
            schema.header_rows = header_rows;
        }
        for (field, column) in overrides.columns {
            match column {
                Some(column) => schema.columns.insert(field, column),
                None => schema.columns.remove(&field),
            };
        }
        schema
    }
}

/// シートごとに解決済みの列番号
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    indices: [Option<usize>; 11],
}

impl ResolvedColumns {
    pub fn get(&self, field: Field) -> Option<usize> {
        self.indices[field.index()]
    }
}

impl ColumnSchema {
    /// シートを見ずに分かる設定の誤りを検出
    pub fn validate(&self) -> Result<()> {
        if let Some(field) = Field::ALL
            .iter()
            .find(|f| f.is_required() && !self.columns.contains_key(*f))
        {
            return Err(Error::Config(format!(
                "no column configured for required field '{}'",
                field
            )));
        }

        if self.header_rows == 0 {
            let by_header = self
                .columns
                .iter()
                .find(|(_, column)| matches!(column, ColumnRef::Header(_)));
            if let Some((field, _)) = by_header {
                return Err(Error::Config(format!(
                    "field '{}' is located by header name but header_rows is 0",
                    field
                )));
            }
        }

        Ok(())
    }

    /// シートのヘッダー行・列数に対して列を解決
    ///
    /// # Arguments
    /// * `sheet` - エラーメッセージ用のシート名
    /// * `header` - 最終ヘッダー行のセル文字列（ヘッダー行なしなら None）
    /// * `width` - シートの列数
    pub fn resolve(
        &self,
        sheet: &str,
        header: Option<&[String]>,
        width: usize,
    ) -> Result<ResolvedColumns> {
        let mut resolved = ResolvedColumns::default();

        for field in Field::ALL {
            let found = match self.columns.get(&field) {
                None => Err("no column configured".to_string()),
                Some(ColumnRef::Index(index)) if *index < width => Ok(*index),
                Some(ColumnRef::Index(index)) => Err(format!(
                    "column index {} is beyond sheet width {}",
                    index, width
                )),
                Some(ColumnRef::Header(name)) => match header {
                    None => Err(format!("header '{}' requested but sheet has no header row", name)),
                    Some(cells) => {
                        let wanted = normalize_key(name);
                        cells
                            .iter()
                            .position(|cell| normalize_key(cell) == wanted)
                            .ok_or_else(|| format!("header '{}' not present", name))
                    }
                },
            };

            match found {
                Ok(index) => resolved.indices[field.index()] = Some(index),
                Err(reason) if field.is_required() => {
                    return Err(Error::MissingColumn {
                        field: field.to_string(),
                        sheet: sheet.to_string(),
                        reason,
                    });
                }
                Err(_) => {}
            }
        }

        Ok(resolved)
    }
}
