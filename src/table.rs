//! 表の計算（1リクエスト分）
//!
//! 対象ソースを並列に読み込み、共通ライブラリの `assemble` で
//! 表と失敗サマリーを組み立てる。HTTPとCLIの両方から使う。

use crate::config::Config;
use crate::error::{OnTrackError, Result};
use crate::reader::read_source;
use ontrack_common::{
    assemble, Event, Failure, Gender, RawRow, ReferenceData, SortColumn, SortDirection, SortSpec,
    TableOptions, TableReport,
};
use rayon::prelude::*;
use serde::Deserialize;
use tracing::{info, warn};

/// 文字列のままの絞り込み条件（クエリ文字列・CLI引数）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TableQuery {
    /// カンマ区切りの大会コード
    pub meets: Option<String>,
    pub gender: Option<String>,
    pub state: Option<String>,
    /// カンマ区切りの種目ラベル
    pub events: Option<String>,
    pub include_foreign: Option<bool>,
    pub best_times_only: Option<bool>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

/// 検証済みのリクエスト
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRequest {
    /// 空なら全大会
    pub meets: Vec<String>,
    pub options: TableOptions,
}

fn split_list(text: Option<&str>) -> Vec<String> {
    text.map(|t| {
        t.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl TableQuery {
    /// 文字列を検証して `TableRequest` に変換
    pub fn parse(&self) -> Result<TableRequest> {
        let gender = non_empty(&self.gender)
            .map(|g| g.parse::<Gender>().map_err(OnTrackError::InvalidQuery))
            .transpose()?;

        let events = split_list(self.events.as_deref())
            .iter()
            .map(|label| label.parse::<Event>().map_err(OnTrackError::InvalidQuery))
            .collect::<Result<Vec<_>>>()?;

        let direction = non_empty(&self.direction)
            .map(|d| d.parse::<SortDirection>().map_err(OnTrackError::InvalidQuery))
            .transpose()?;
        let sort = match non_empty(&self.sort) {
            Some(column) => {
                let column = column
                    .parse::<SortColumn>()
                    .map_err(OnTrackError::InvalidQuery)?;
                Some(SortSpec { column, direction })
            }
            None if direction.is_some() => {
                return Err(OnTrackError::InvalidQuery(
                    "direction requires a sort column".into(),
                ))
            }
            None => None,
        };

        Ok(TableRequest {
            meets: split_list(self.meets.as_deref()),
            options: TableOptions {
                gender,
                state: non_empty(&self.state).map(|s| s.to_uppercase()),
                events,
                include_foreign: self.include_foreign.unwrap_or(true),
                best_times_only: self.best_times_only.unwrap_or(false),
                sort,
            },
        })
    }
}

/// 設定されたソースから表を計算
///
/// # Arguments
/// * `config` - ソース一覧と列スキーマ
/// * `refs` - 起動時に読み込んだ参照データ
/// * `request` - 絞り込み・ソート条件
///
/// 読めないファイルは失敗として記録し、残りのファイルで表を組み立てる。
pub fn build_table(config: &Config, refs: &ReferenceData, request: &TableRequest) -> Result<TableReport> {
    let known = config.meets();
    for meet in &request.meets {
        if !known.iter().any(|k| k.eq_ignore_ascii_case(meet)) {
            return Err(OnTrackError::InvalidQuery(format!("unknown meet: {}", meet)));
        }
    }

    let sources = config.select_sources(&request.meets, request.options.gender);
    info!(sources = sources.len(), "building table");

    // 並列読み込み（結果はソース設定順）
    let loaded: Vec<(String, Result<Vec<RawRow>>)> = sources
        .par_iter()
        .map(|source| {
            let path = config.resolve_path(&source.path);
            let rows = read_source(source, &path, &config.columns);
            (path.display().to_string(), rows)
        })
        .collect();

    let mut raw_rows = Vec::new();
    let mut failures = Vec::new();
    for (file, result) in loaded {
        match result {
            Ok(rows) => raw_rows.extend(rows),
            Err(e) => failures.push(Failure::file(file, e.to_string())),
        }
    }

    let report = assemble(raw_rows, failures, refs, &request.options);
    log_failures(&report.failures);
    info!(
        rows = report.summary.rows,
        files_failed = report.summary.files_failed,
        rows_excluded = report.summary.rows_excluded,
        missing_targets = report.summary.missing_targets,
        "table built"
    );

    Ok(report)
}

fn log_failures(failures: &[Failure]) {
    for failure in failures {
        warn!(
            kind = %failure.kind,
            file = %failure.file,
            sheet = failure.sheet.as_deref().unwrap_or("-"),
            row = failure.row.unwrap_or(0),
            name = failure.name.as_deref().unwrap_or("-"),
            event = failure.event.as_deref().unwrap_or("-"),
            "{}",
            failure.message
        );
    }
}
