//! 失敗サマリーと計算結果

use crate::types::{ResultRow, RowOrigin};
use serde::Serialize;
use std::fmt;

/// 失敗の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// ファイルが無い・読めない・列スキーマ不一致（ファイルごとスキップ）
    FileUnreadable,
    /// タイムが読めない（行除外）
    TimeUnparsable,
    /// 生年月日が不正（行除外）
    BirthdateMalformed,
    /// 大会日付が不正（行除外）
    MeetDateMalformed,
    /// 性別・距離・泳法が読めない（行除外）
    UnrecognizedEvent,
    /// ターゲットタイム未登録（行は表示、ターゲット欄は空）
    MissingTarget,
}

impl FailureKind {
    /// 行（またはファイル）が結果から除外されたか
    pub fn excludes_row(&self) -> bool {
        !matches!(self, FailureKind::MissingTarget)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::FileUnreadable => "file unreadable",
            FailureKind::TimeUnparsable => "time unparsable",
            FailureKind::BirthdateMalformed => "birthdate malformed",
            FailureKind::MeetDateMalformed => "meet date malformed",
            FailureKind::UnrecognizedEvent => "unrecognized event",
            FailureKind::MissingTarget => "missing target",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 失敗1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    pub kind: FailureKind,
    pub file: String,
    pub sheet: Option<String>,
    pub row: Option<usize>,
    pub name: Option<String>,
    pub event: Option<String>,
    pub message: String,
}

impl Failure {
    /// ファイル単位の失敗
    pub fn file(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::FileUnreadable,
            file: file.into(),
            sheet: None,
            row: None,
            name: None,
            event: None,
            message: message.into(),
        }
    }

    /// 行単位の失敗
    pub fn row(
        origin: &RowOrigin,
        kind: FailureKind,
        name: &str,
        event: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            file: origin.file.clone(),
            sheet: Some(origin.sheet.clone()),
            row: Some(origin.row),
            name: (!name.trim().is_empty()).then(|| name.trim().to_string()),
            event,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.file)?;
        if let Some(sheet) = &self.sheet {
            write!(f, " / {}", sheet)?;
        }
        if let Some(row) = self.row {
            write!(f, " row {}", row)?;
        }
        if let Some(name) = &self.name {
            write!(f, " ({}", name)?;
            if let Some(event) = &self.event {
                write!(f, ", {}", event)?;
            }
            write!(f, ")")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// 集計情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub rows: usize,
    pub files_failed: usize,
    pub rows_excluded: usize,
    pub missing_targets: usize,
}

/// 1リクエスト分の計算結果（表 + 失敗サマリー）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReport {
    pub rows: Vec<ResultRow>,
    pub failures: Vec<Failure>,
    pub summary: TableSummary,
}

impl TableReport {
    pub fn new(rows: Vec<ResultRow>, failures: Vec<Failure>) -> Self {
        let mut summary = TableSummary {
            rows: rows.len(),
            ..Default::default()
        };
        for failure in &failures {
            match failure.kind {
                FailureKind::FileUnreadable => summary.files_failed += 1,
                kind if kind.excludes_row() => summary.rows_excluded += 1,
                _ => summary.missing_targets += 1,
            }
        }
        Self {
            rows,
            failures,
            summary,
        }
    }
}
