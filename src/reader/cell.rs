//! calamineセル値の変換

use calamine::Data;
use ontrack_common::normalize::parse_place;
use ontrack_common::RawDate;

/// 範囲外セルの代わりに使う空セル
pub static EMPTY_CELL: Data = Data::Empty;

/// セルの表示テキスト（整数値の浮動小数は小数部なしで返す）
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

/// 数値セル、または数値として読める文字列
pub fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// タイムセルの秒数
///
/// 時刻書式のセル（1日未満のシリアル値）は日数から秒に換算する。
pub fn cell_seconds(cell: &Data) -> Option<f64> {
    match cell {
        Data::DateTime(dt) if dt.as_f64() < 1.0 => Some(dt.as_f64() * 86_400.0),
        _ => cell_number(cell).filter(|v| *v > 0.0),
    }
}

/// 順位セル（"1", "=3", 3.0 など）
pub fn cell_place(cell: &Data) -> Option<u32> {
    match cell {
        Data::Int(i) => u32::try_from(*i).ok().filter(|p| *p > 0),
        Data::Float(f) if *f > 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64 => {
            Some(*f as u32)
        }
        Data::String(s) => parse_place(s),
        _ => None,
    }
}

/// 日付セル
pub fn cell_date(cell: &Data) -> RawDate {
    match cell {
        Data::DateTime(dt) => RawDate::Serial(dt.as_f64()),
        Data::Float(f) => RawDate::Serial(*f),
        Data::Int(i) => RawDate::Serial(*i as f64),
        Data::DateTimeIso(s) => RawDate::Text(s.clone()),
        Data::String(s) if !s.trim().is_empty() => RawDate::Text(s.trim().to_string()),
        _ => RawDate::Empty,
    }
}
