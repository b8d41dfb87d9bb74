//! 結果シートの選別

use regex::Regex;

/// シート名に含まれていたら対象外とする語
const EXCLUDED_MARKERS: &[&str] = &["Lap", "Top Results", "5000m"];

/// 個人種目の結果シートかどうか判定
///
/// ラップ表・上位結果・5000m・リレー（`4x100`, `4 x 200` など数字-x-数字）を除外する。
pub fn is_result_sheet(name: &str) -> bool {
    lazy_static::lazy_static! {
        static ref RELAY_RE: Regex = Regex::new(r"\d\s*[xX×]\s*\d").unwrap();
    }

    if EXCLUDED_MARKERS.iter().any(|marker| name.contains(marker)) {
        return false;
    }

    !RELAY_RE.is_match(name)
}
