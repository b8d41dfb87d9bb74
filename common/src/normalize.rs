//! 属性の正規化
//!
//! - 年齢: 大会年 − 生年（大会年の12月31日時点）
//! - 所属・氏名の表記ゆれ吸収
//! - 日付セル・順位セルの解釈

use crate::types::RawDate;
use chrono::{Datelike, Duration, NaiveDate};

/// Excelシリアル値の上限（9999-12-31）
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// 照合キー用: 小文字化して空白を1つにまとめる
pub fn normalize_key(text: &str) -> String {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 氏名照合用: 記号を除去し、小文字化して空白をまとめる
pub fn normalize_name(name: &str) -> String {
    let stripped: String = name
        .replace(['\u{2019}', '\''], "")
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();
    normalize_key(&stripped)
}

/// 大会年時点の年齢（月日は考慮しない）
///
/// 生年が大会年より後なら None。
pub fn age_at_meet(birth: NaiveDate, meet: NaiveDate) -> Option<u32> {
    let age = meet.year() - birth.year();
    u32::try_from(age).ok()
}

/// Excelシリアル値を日付に変換（1900年閏年バグ込みの 1899-12-30 起点）
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// 日付文字列をパース
///
/// ISO (`2008-05-01`)、日/月/年 (`01/05/2008`, `01-05-2008`, `01.05.2008`)、
/// 年のみ (`2008` → 1月1日) を受け付ける。時刻部分は無視する。
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let date_part = text.split(['T', ' ']).next().unwrap_or(text);

    const FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Some(date);
        }
    }

    if date_part.len() == 4 && date_part.chars().all(|c| c.is_ascii_digit()) {
        let year: i32 = date_part.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    None
}

/// 日付セルの生値を解釈
pub fn parse_date(raw: &RawDate) -> Option<NaiveDate> {
    match raw {
        RawDate::Serial(serial) => excel_serial_to_date(*serial),
        RawDate::Text(text) => parse_date_text(text),
        RawDate::Empty => None,
    }
}

/// 順位セルをパース（"1", "=3", "2." など）。失格・棄権・0 は None。
pub fn parse_place(text: &str) -> Option<u32> {
    let text = text.trim().trim_start_matches('=').trim_end_matches('.');
    match text.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(place) => Some(place),
    }
}
