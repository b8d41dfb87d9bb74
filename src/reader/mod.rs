//! 競技結果ワークブックの読み込み
//!
//! 大会・性別ごとのワークブックを開き、対象シートの各行を
//! `RawRow` として順に返す。列位置はシートごとにヘッダー行から解決する。

pub mod cell;

use crate::config::MeetSource;
use crate::error::{OnTrackError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use cell::{cell_date, cell_number, cell_place, cell_seconds, cell_text, EMPTY_CELL};
use ontrack_common::{
    is_result_sheet, ColumnSchema, Field, Gender, RawRow, ResolvedColumns, RowOrigin,
};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 1ファイル分の行イテレータ
///
/// シートは必要になった時点で読み込む。列スキーマの解決に失敗した場合は
/// エラーを1回返して終了する。
pub struct WorkbookRows {
    file: String,
    meet: String,
    gender: Gender,
    schema: ColumnSchema,
    workbook: Sheets<BufReader<File>>,
    pending: std::vec::IntoIter<String>,
    current: Option<SheetCursor>,
}

struct SheetCursor {
    name: String,
    range: Range<Data>,
    columns: ResolvedColumns,
    next_row: u32,
    last_row: u32,
}

/// ソース設定からワークブックを開く
///
/// # Arguments
/// * `source` - 大会コード・性別
/// * `path` - 解決済みのファイルパス
/// * `schema` - 列スキーマ
pub fn open_source(source: &MeetSource, path: &Path, schema: &ColumnSchema) -> Result<WorkbookRows> {
    open_workbook_rows(path, &source.meet, source.gender, schema)
}

pub fn open_workbook_rows(
    path: &Path,
    meet: &str,
    gender: Gender,
    schema: &ColumnSchema,
) -> Result<WorkbookRows> {
    let file = path.display().to_string();
    if !path.exists() {
        return Err(OnTrackError::FileNotFound(file));
    }

    let workbook = open_workbook_auto(path).map_err(|e| OnTrackError::WorkbookOpen {
        path: file.clone(),
        reason: e.to_string(),
    })?;

    let sheets: Vec<String> = workbook
        .sheet_names()
        .into_iter()
        .filter(|name| is_result_sheet(name))
        .collect();
    tracing::debug!(file = %file, sheets = sheets.len(), "workbook opened");

    Ok(WorkbookRows {
        file,
        meet: meet.to_string(),
        gender,
        schema: schema.clone(),
        workbook,
        pending: sheets.into_iter(),
        current: None,
    })
}

/// ファイル全体を読み込む（途中でエラーがあればファイルごと失敗）
pub fn read_source(source: &MeetSource, path: &Path, schema: &ColumnSchema) -> Result<Vec<RawRow>> {
    open_source(source, path, schema)?.collect()
}

impl SheetCursor {
    fn cell(&self, row: u32, field: Field) -> &Data {
        self.columns
            .get(field)
            .and_then(|col| self.range.get_value((row, col as u32)))
            .unwrap_or(&EMPTY_CELL)
    }
}

impl WorkbookRows {
    fn open_sheet(&mut self, name: &str) -> Result<Option<SheetCursor>> {
        let range = self
            .workbook
            .worksheet_range(name)
            .map_err(|e| OnTrackError::WorkbookOpen {
                path: self.file.clone(),
                reason: format!("{}: {}", name, e),
            })?;

        // 空シートは読み飛ばす
        let Some((last_row, last_col)) = range.end() else {
            return Ok(None);
        };
        let width = last_col as usize + 1;

        let header_rows = self.schema.header_rows as u32;
        let header: Option<Vec<String>> = (header_rows > 0).then(|| {
            (0..width as u32)
                .map(|col| {
                    range
                        .get_value((header_rows - 1, col))
                        .map(cell_text)
                        .unwrap_or_default()
                })
                .collect()
        });

        let columns = self.schema.resolve(name, header.as_deref(), width)?;

        Ok(Some(SheetCursor {
            name: name.to_string(),
            range,
            columns,
            next_row: header_rows,
            last_row,
        }))
    }

    fn row_at(&self, cursor: &SheetCursor, row: u32) -> Option<RawRow> {
        let get = |field: Field| cursor.cell(row, field);

        let name = cell_text(get(Field::Name));
        if name.is_empty() {
            return None;
        }

        let time_cell = get(Field::Time);
        let time_text = match time_cell {
            Data::String(s) => s.trim().to_string(),
            _ => String::new(),
        };
        // 数値で入力されたタイムは秒数として扱う
        let time_seconds = cell_seconds(get(Field::TimeSeconds))
            .or_else(|| time_text.is_empty().then(|| cell_seconds(time_cell)).flatten());

        Some(RawRow {
            origin: RowOrigin {
                file: self.file.clone(),
                sheet: cursor.name.clone(),
                row: row as usize + 1,
            },
            meet: self.meet.clone(),
            fallback_gender: Some(self.gender),
            gender: cell_text(get(Field::Gender)),
            distance: cell_text(get(Field::Distance)),
            stroke: cell_text(get(Field::Stroke)),
            name,
            birthdate: cell_date(get(Field::Birthdate)),
            time_text,
            time_seconds,
            score: cell_number(get(Field::Score)),
            place: cell_place(get(Field::Place)),
            meet_date: cell_date(get(Field::MeetDate)),
            team: cell_text(get(Field::Team)),
        })
    }
}

impl Iterator for WorkbookRows {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(mut cursor) = self.current.take() {
                while cursor.next_row <= cursor.last_row {
                    let row = cursor.next_row;
                    cursor.next_row += 1;
                    if let Some(raw) = self.row_at(&cursor, row) {
                        self.current = Some(cursor);
                        return Some(Ok(raw));
                    }
                }
            }

            let name = self.pending.next()?;
            match self.open_sheet(&name) {
                Ok(cursor) => self.current = cursor,
                Err(e) => {
                    self.pending = Vec::new().into_iter();
                    return Some(Err(e));
                }
            }
        }
    }
}
