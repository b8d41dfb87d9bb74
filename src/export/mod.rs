//! Excel出力
//!
//! 計算結果の表を "On Track" シートに、失敗サマリーを "Failures" シートに書き出す。

use crate::error::Result;
use ontrack_common::TableReport;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::Path;

pub const TABLE_SHEET: &str = "On Track";
pub const FAILURE_SHEET: &str = "Failures";

const TABLE_HEADERS: [(&str, f64); 13] = [
    ("Pos", 6.0),
    ("Name", 28.0),
    ("Team", 10.0),
    ("Age", 6.0),
    ("Gender", 8.0),
    ("Event", 12.0),
    ("Meet", 10.0),
    ("Time", 10.0),
    ("Score", 8.0),
    ("Target", 10.0),
    ("Target Score", 12.0),
    ("Difference", 11.0),
    ("Foreign", 8.0),
];

const FAILURE_HEADERS: [(&str, f64); 7] = [
    ("Kind", 20.0),
    ("File", 36.0),
    ("Sheet", 18.0),
    ("Row", 6.0),
    ("Name", 24.0),
    ("Event", 12.0),
    ("Message", 48.0),
];

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA))
}

fn write_headers(sheet: &mut Worksheet, headers: &[(&str, f64)]) -> Result<()> {
    let format = header_format();
    for (col, (title, width)) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &format)?;
        sheet.set_column_width(col as u16, *width)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

/// 表と失敗サマリーをワークブックに書き出す
pub fn write_report(report: &TableReport, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let negative = Format::new().set_font_color(Color::RGB(0xB00020));

    let sheet = workbook.add_worksheet();
    sheet.set_name(TABLE_SHEET)?;
    write_headers(sheet, &TABLE_HEADERS)?;

    for (i, row) in report.rows.iter().enumerate() {
        let r = i as u32 + 1;
        if let Some(place) = row.place {
            sheet.write_number(r, 0, place)?;
        }
        sheet.write_string(r, 1, &row.name)?;
        sheet.write_string(r, 2, &row.team)?;
        sheet.write_number(r, 3, row.age)?;
        sheet.write_string(r, 4, row.gender.as_str())?;
        sheet.write_string(r, 5, row.event.label())?;
        sheet.write_string(r, 6, &row.meet)?;
        sheet.write_string(r, 7, row.time.to_string())?;
        if let Some(score) = row.score {
            sheet.write_number(r, 8, score)?;
        }
        if let Some(target) = row.target_time {
            sheet.write_string(r, 9, target.to_string())?;
        }
        if let Some(target_score) = row.target_score {
            sheet.write_number(r, 10, target_score)?;
        }
        if let Some(diff) = row.difference {
            if diff < 0 {
                sheet.write_number_with_format(r, 11, diff as f64, &negative)?;
            } else {
                sheet.write_number(r, 11, diff as f64)?;
            }
        }
        if row.foreign {
            sheet.write_string(r, 12, "Y")?;
        }
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name(FAILURE_SHEET)?;
    write_headers(sheet, &FAILURE_HEADERS)?;

    for (i, failure) in report.failures.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, failure.kind.as_str())?;
        sheet.write_string(r, 1, &failure.file)?;
        if let Some(name) = &failure.sheet {
            sheet.write_string(r, 2, name)?;
        }
        if let Some(row) = failure.row {
            sheet.write_number(r, 3, row as f64)?;
        }
        if let Some(name) = &failure.name {
            sheet.write_string(r, 4, name)?;
        }
        if let Some(event) = &failure.event {
            sheet.write_string(r, 5, event)?;
        }
        sheet.write_string(r, 6, &failure.message)?;
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    workbook.save(output_path)?;
    Ok(())
}
