//! 参照データの読み込み
//!
//! 起動時に一度だけ、参照ワークブック（ターゲット表・基準タイム表）と
//! エイリアス・外国籍選手リストを読み込んで `ReferenceData` にまとめる。

use crate::config::Config;
use crate::error::{OnTrackError, Result};
use crate::reader::cell::{cell_number, cell_text, EMPTY_CELL};
use calamine::{open_workbook_auto, Data, Range, Reader};
use ontrack_common::{
    AliasTable, BaseTimes, Event, ForeignSwimmerSet, Gender, ReferenceData, SwimTime, TargetTable,
};
use std::path::Path;
use tracing::{info, warn};

/// 設定に従って参照データ一式を読み込む
pub fn load_reference_data(config: &Config) -> Result<ReferenceData> {
    let path = config.resolve_path(&config.reference.path);
    let (targets, base_times) = load_reference_workbook(
        &path,
        &config.reference.target_sheet,
        &config.reference.base_sheet,
    )?;

    let mut aliases = AliasTable::from_preset(&config.alias_preset).ok_or_else(|| {
        OnTrackError::Config(format!("不明なエイリアスプリセット: {}", config.alias_preset))
    })?;
    if let Some(alias_file) = &config.alias_file {
        let extra = AliasTable::from_file(&config.resolve_path(alias_file))?;
        aliases.merge(&extra);
    }

    let foreign = match &config.foreign_file {
        Some(file) => ForeignSwimmerSet::from_file(&config.resolve_path(file))?,
        None => ForeignSwimmerSet::default(),
    };

    info!(
        targets = targets.len(),
        base_times = base_times.len(),
        aliases = aliases.len(),
        foreign = foreign.len(),
        "reference data loaded"
    );

    Ok(ReferenceData {
        targets,
        base_times,
        aliases,
        foreign,
    })
}

/// 参照ワークブックからターゲット表と基準タイム表を読む
pub fn load_reference_workbook(
    path: &Path,
    target_sheet: &str,
    base_sheet: &str,
) -> Result<(TargetTable, BaseTimes)> {
    let file = path.display().to_string();
    if !path.exists() {
        return Err(OnTrackError::FileNotFound(file));
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| OnTrackError::WorkbookOpen {
        path: file.clone(),
        reason: e.to_string(),
    })?;

    let mut sheet = |name: &str| -> Result<Range<Data>> {
        if !workbook.sheet_names().iter().any(|s| s == name) {
            return Err(OnTrackError::SheetNotFound {
                path: file.clone(),
                sheet: name.to_string(),
            });
        }
        workbook
            .worksheet_range(name)
            .map_err(|e| OnTrackError::WorkbookOpen {
                path: file.clone(),
                reason: format!("{}: {}", name, e),
            })
    };

    let targets = parse_target_sheet(&sheet(target_sheet)?);
    let base_times = parse_base_sheet(&sheet(base_sheet)?);

    if targets.is_empty() {
        return Err(OnTrackError::InvalidReference(format!(
            "{} にターゲットタイムがありません",
            target_sheet
        )));
    }

    Ok((targets, base_times))
}

/// 時刻文字列、または秒数のセル
fn cell_time(cell: &Data) -> Option<SwimTime> {
    match cell {
        Data::String(s) => SwimTime::parse(s),
        _ => cell_number(cell).and_then(SwimTime::from_seconds),
    }
}

/// ターゲット表: 性別 | 種目ラベル | 年齢 | ターゲットタイム（ヘッダー1行）
///
/// 読めない行は警告を出して読み飛ばす。
pub fn parse_target_sheet(range: &Range<Data>) -> TargetTable {
    let mut table = TargetTable::new();

    for (i, row) in range.rows().enumerate().skip(1) {
        let cell = |col: usize| row.get(col).unwrap_or(&EMPTY_CELL);
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }

        let gender = Gender::parse(&cell_text(cell(0)));
        let event = Event::parse_label(&cell_text(cell(1)));
        let age = cell_number(cell(2))
            .filter(|a| *a > 0.0 && a.fract() == 0.0)
            .map(|a| a as u32);
        let time = cell_time(cell(3));

        match (gender, event, age, time) {
            (Some(gender), Some(event), Some(age), Some(time)) => {
                table.insert(gender, &event, age, time)
            }
            _ => warn!(
                row = i + 1,
                gender = %cell_text(cell(0)),
                event = %cell_text(cell(1)),
                "skipping unreadable target entry"
            ),
        }
    }

    table
}

/// 基準タイム表: 1行目がB列からの種目ラベル、以降A列が性別の行
pub fn parse_base_sheet(range: &Range<Data>) -> BaseTimes {
    let mut base = BaseTimes::new();
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return base;
    };
    let events: Vec<Option<Event>> = header
        .iter()
        .skip(1)
        .map(|c| Event::parse_label(&cell_text(c)))
        .collect();

    for row in rows {
        let Some(gender) = row.first().and_then(|c| Gender::parse(&cell_text(c))) else {
            continue;
        };
        for (event, cell) in events.iter().zip(row.iter().skip(1)) {
            let Some(event) = event else { continue };
            match cell_time(cell) {
                Some(time) => base.insert(gender, *event, time.seconds()),
                None if matches!(cell, Data::Empty) => {}
                None => warn!(
                    gender = %gender,
                    event = %event,
                    value = %cell_text(cell),
                    "skipping unreadable base time"
                ),
            }
        }
    }

    base
}
