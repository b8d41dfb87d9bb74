//! 行の組み立て
//!
//! ## 処理フロー
//! 1. 性別・種目の判定（表示フィルタもここで適用）
//! 2. 所属の州コード解決、外国籍判定（同上）
//! 3. タイム・生年月日・大会日付の解釈、年齢計算
//! 4. スコア・ターゲット・差分の計算
//! 5. ベストタイム絞り込み、ソート

use crate::alias::AliasTable;
use crate::foreign::{ForeignSwimmerSet, FOREIGN_MARKER};
use crate::normalize::{age_at_meet, normalize_key, normalize_name, parse_date};
use crate::report::{Failure, FailureKind, TableReport};
use crate::score::{point_score, BaseTimes};
use crate::sort::{sort_rows, SortSpec};
use crate::swim_time::SwimTime;
use crate::target::TargetTable;
use crate::types::{Event, Gender, RawRow, ResultRow};
use std::collections::HashMap;

/// 起動時に一度だけ読み込む参照データ（以後は読み取り専用）
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub targets: TargetTable,
    pub base_times: BaseTimes,
    pub aliases: AliasTable,
    pub foreign: ForeignSwimmerSet,
}

/// 表示オプション
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    pub gender: Option<Gender>,
    /// 州コードでの絞り込み（大文字小文字は無視）
    pub state: Option<String>,
    /// 空なら全種目
    pub events: Vec<Event>,
    pub include_foreign: bool,
    pub best_times_only: bool,
    pub sort: Option<SortSpec>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            gender: None,
            state: None,
            events: Vec::new(),
            include_foreign: true,
            best_times_only: false,
            sort: None,
        }
    }
}

/// 1行の処理結果
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// 表示する行（ターゲット欠落の記録付きの場合あり）
    Row(ResultRow, Option<Failure>),
    /// 表示フィルタで除外
    Filtered,
    /// 失敗により除外
    Failed(Failure),
}

/// 生データ1行を表示行に変換
pub fn assemble_row(raw: &RawRow, refs: &ReferenceData, options: &TableOptions) -> RowOutcome {
    let fail = |kind: FailureKind, event: Option<&Event>, message: String| {
        RowOutcome::Failed(Failure::row(
            &raw.origin,
            kind,
            &raw.name,
            event.map(Event::label),
            message,
        ))
    };

    // 1. 性別・種目
    let event = match Event::from_parts(&raw.distance, &raw.stroke) {
        Some(event) => event,
        None => {
            return fail(
                FailureKind::UnrecognizedEvent,
                None,
                format!("cannot read event from '{}' / '{}'", raw.distance, raw.stroke),
            )
        }
    };
    let gender = match Gender::parse(&raw.gender).or(raw.fallback_gender) {
        Some(gender) => gender,
        None => {
            return fail(
                FailureKind::UnrecognizedEvent,
                Some(&event),
                format!("cannot read gender from '{}'", raw.gender),
            )
        }
    };
    if options.gender.is_some_and(|g| g != gender) {
        return RowOutcome::Filtered;
    }
    if !options.events.is_empty() && !options.events.contains(&event) {
        return RowOutcome::Filtered;
    }

    // 2. 所属・外国籍（除外される行は失敗として数えない）
    let team = refs.aliases.resolve(&raw.team);
    if let Some(state) = &options.state {
        if normalize_key(state) != normalize_key(&team.team) {
            return RowOutcome::Filtered;
        }
    }
    let foreign = refs.foreign.contains(&raw.name);
    if foreign && !options.include_foreign {
        return RowOutcome::Filtered;
    }
    let name = raw.name.split_whitespace().collect::<Vec<_>>().join(" ");
    let name = if foreign {
        format!("{}{}", name, FOREIGN_MARKER)
    } else {
        name
    };

    // 3. タイム・日付
    let time = match SwimTime::parse(&raw.time_text)
        .or_else(|| raw.time_seconds.and_then(SwimTime::from_seconds))
    {
        Some(time) => time,
        None => {
            return fail(
                FailureKind::TimeUnparsable,
                Some(&event),
                format!("time '{}' is not a valid swim time", raw.time_text.trim()),
            )
        }
    };
    let birth = match parse_date(&raw.birthdate) {
        Some(date) => date,
        None => {
            return fail(
                FailureKind::BirthdateMalformed,
                Some(&event),
                format!("birthdate {:?} is not a date", raw.birthdate),
            )
        }
    };
    let meet_date = match parse_date(&raw.meet_date) {
        Some(date) => date,
        None => {
            return fail(
                FailureKind::MeetDateMalformed,
                Some(&event),
                format!("meet date {:?} is not a date", raw.meet_date),
            )
        }
    };
    let age = match age_at_meet(birth, meet_date) {
        Some(age) => age,
        None => {
            return fail(
                FailureKind::BirthdateMalformed,
                Some(&event),
                format!("birthdate {} is after meet date {}", birth, meet_date),
            )
        }
    };

    // 4. スコア・ターゲット
    let base = refs.base_times.get(gender, &event);
    let score = match base {
        Some(base) => match point_score(base, time.seconds()) {
            Some(score) => Some(score),
            None => {
                return fail(
                    FailureKind::TimeUnparsable,
                    Some(&event),
                    format!("time {} is implausible against base time {:.2}", time, base),
                )
            }
        },
        None => raw
            .score
            .filter(|s| s.is_finite() && *s >= 0.0 && *s <= u32::MAX as f64)
            .map(|s| s.floor() as u32),
    };
    let target_time = refs.targets.lookup(gender, &event, age);
    let target_score = match (base, target_time) {
        (Some(base), Some(target)) => point_score(base, target.seconds()),
        _ => None,
    };
    let difference = match (score, target_score) {
        (Some(score), Some(target)) => Some(score as i64 - target as i64),
        _ => None,
    };
    let missing = target_time.is_none().then(|| {
        Failure::row(
            &raw.origin,
            FailureKind::MissingTarget,
            &raw.name,
            Some(event.label()),
            format!("no target time for {} {} age {}", gender, event, age),
        )
    });

    RowOutcome::Row(
        ResultRow {
            gender,
            event,
            name,
            team: team.team,
            team_resolved: team.resolved,
            age,
            meet: raw.meet.clone(),
            time,
            score,
            place: raw.place,
            target_time,
            target_score,
            difference,
            foreign,
        },
        missing,
    )
}

/// 選手・性別・種目ごとに最速の行だけ残す（同タイムは先に出た行）
///
/// 行に付いたターゲット欠落の記録も行と一緒に残る/捨てられる。
/// 残った行はグループの初出位置に並ぶ。
pub fn keep_best_times(
    rows: Vec<(ResultRow, Option<Failure>)>,
) -> Vec<(ResultRow, Option<Failure>)> {
    let mut positions: HashMap<(String, Gender, Event), usize> = HashMap::new();
    let mut kept: Vec<(ResultRow, Option<Failure>)> = Vec::new();

    for entry in rows {
        let row = &entry.0;
        let key = (normalize_name(&row.name), row.gender, row.event);
        match positions.get(&key) {
            Some(&index) => {
                if row.time < kept[index].0.time {
                    kept[index] = entry;
                }
            }
            None => {
                positions.insert(key, kept.len());
                kept.push(entry);
            }
        }
    }

    kept
}

/// 生データ列から表と失敗サマリーを組み立てる
///
/// # Arguments
/// * `raw_rows` - ワークブックから読んだ行（ファイル単位の失敗は `failures` に渡す）
/// * `failures` - 既に発生している失敗（ファイル読み込みエラー等）
pub fn assemble<I>(
    raw_rows: I,
    mut failures: Vec<Failure>,
    refs: &ReferenceData,
    options: &TableOptions,
) -> TableReport
where
    I: IntoIterator<Item = RawRow>,
{
    let mut entries = Vec::new();

    for raw in raw_rows {
        match assemble_row(&raw, refs, options) {
            RowOutcome::Row(row, missing) => entries.push((row, missing)),
            RowOutcome::Filtered => {}
            RowOutcome::Failed(failure) => failures.push(failure),
        }
    }

    if options.best_times_only {
        entries = keep_best_times(entries);
    }

    let mut rows = Vec::with_capacity(entries.len());
    for (row, missing) in entries {
        rows.push(row);
        failures.extend(missing);
    }
    sort_rows(&mut rows, options.sort.as_ref());

    TableReport::new(rows, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TableSummary;
    use crate::sort::SortColumn;
    use crate::types::{RawDate, RowOrigin, Stroke};

    fn refs() -> ReferenceData {
        let free = Event::new(100, Stroke::Free);
        let mut refs = ReferenceData {
            aliases: AliasTable::from_preset("malaysia").unwrap(),
            foreign: ForeignSwimmerSet::from_names(["John Smith"]),
            ..Default::default()
        };
        refs.base_times.insert(Gender::M, free, 48.0);
        refs.targets
            .insert(Gender::M, &free, 16, SwimTime::parse("52.00").unwrap());
        refs
    }

    fn raw(name: &str, time: &str) -> RawRow {
        RawRow {
            origin: RowOrigin {
                file: "sukma_m.xlsx".to_string(),
                sheet: "100 Free".to_string(),
                row: 2,
            },
            meet: "SUKMA".to_string(),
            fallback_gender: Some(Gender::M),
            gender: "M".to_string(),
            distance: "100".to_string(),
            stroke: "Free".to_string(),
            name: name.to_string(),
            birthdate: RawDate::Text("2008-05-01".to_string()),
            time_text: time.to_string(),
            time_seconds: None,
            score: None,
            place: Some(1),
            meet_date: RawDate::Text("2024-09-20".to_string()),
            team: "Selangor".to_string(),
        }
    }

    fn expect_row(outcome: RowOutcome) -> (ResultRow, Option<Failure>) {
        match outcome {
            RowOutcome::Row(row, missing) => (row, missing),
            other => panic!("expected row, got {:?}", other),
        }
    }

    #[test]
    fn test_full_row() {
        let (row, missing) = expect_row(assemble_row(&raw("Ali", "50.00"), &refs(), &TableOptions::default()));
        assert_eq!(row.age, 16);
        assert_eq!(row.team, "SEL");
        assert!(row.team_resolved);
        assert_eq!(row.time.to_string(), "50.00");
        // floor(1000 * (48/50)^3) = 884
        assert_eq!(row.score, Some(884));
        assert_eq!(row.target_time.map(|t| t.to_string()), Some("52.00".to_string()));
        // floor(1000 * (48/52)^3) = 786
        assert_eq!(row.target_score, Some(786));
        assert_eq!(row.difference, Some(98));
        assert!(missing.is_none());
    }

    #[test]
    fn test_missing_target_keeps_row() {
        let mut input = raw("Ali", "50.00");
        input.birthdate = RawDate::Text("2006-01-01".to_string());
        let (row, missing) = expect_row(assemble_row(&input, &refs(), &TableOptions::default()));
        assert_eq!(row.age, 18);
        assert_eq!(row.target_time, None);
        assert_eq!(row.target_score, None);
        assert_eq!(row.difference, None);
        assert_eq!(missing.map(|f| f.kind), Some(FailureKind::MissingTarget));
    }

    #[test]
    fn test_unparsable_time_excluded() {
        let outcome = assemble_row(&raw("Ali", "DQ"), &refs(), &TableOptions::default());
        match outcome {
            RowOutcome::Failed(failure) => {
                assert_eq!(failure.kind, FailureKind::TimeUnparsable);
                assert_eq!(failure.name.as_deref(), Some("Ali"));
                assert_eq!(failure.event.as_deref(), Some("100 Free"));
                assert_eq!(failure.sheet.as_deref(), Some("100 Free"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_seconds_column_fallback() {
        let mut input = raw("Ali", "");
        input.time_seconds = Some(50.0);
        let (row, _) = expect_row(assemble_row(&input, &refs(), &TableOptions::default()));
        assert_eq!(row.time.to_string(), "50.00");
    }

    #[test]
    fn test_zero_time_excluded() {
        let mut input = raw("Ali", "0.00");
        input.time_seconds = Some(0.0);
        assert!(matches!(
            assemble_row(&input, &refs(), &TableOptions::default()),
            RowOutcome::Failed(Failure { kind: FailureKind::TimeUnparsable, .. })
        ));
    }

    #[test]
    fn test_malformed_birthdate_excluded() {
        let mut input = raw("Ali", "50.00");
        input.birthdate = RawDate::Text("sometime".to_string());
        assert!(matches!(
            assemble_row(&input, &refs(), &TableOptions::default()),
            RowOutcome::Failed(Failure { kind: FailureKind::BirthdateMalformed, .. })
        ));
    }

    #[test]
    fn test_foreign_swimmer_dropped_when_excluded() {
        let options = TableOptions {
            include_foreign: false,
            ..Default::default()
        };
        let outcome = assemble_row(&raw("JOHN SMITH.", "50.00"), &refs(), &options);
        assert_eq!(outcome, RowOutcome::Filtered);
    }

    #[test]
    fn test_foreign_swimmer_marked_when_included() {
        let (row, _) = expect_row(assemble_row(
            &raw("John  Smith", "50.00"),
            &refs(),
            &TableOptions::default(),
        ));
        assert_eq!(row.name, "John Smith *");
        assert!(row.foreign);
    }

    #[test]
    fn test_no_base_time_uses_sheet_score() {
        let mut input = raw("Ali", "30.00");
        input.distance = "50".to_string();
        input.score = Some(612.0);
        let (row, _) = expect_row(assemble_row(&input, &refs(), &TableOptions::default()));
        assert_eq!(row.score, Some(612));
        assert_eq!(row.target_score, None);
    }

    #[test]
    fn test_state_and_gender_filters() {
        let options = TableOptions {
            state: Some("jOh".to_string()),
            ..Default::default()
        };
        assert_eq!(
            assemble_row(&raw("Ali", "50.00"), &refs(), &options),
            RowOutcome::Filtered
        );

        let options = TableOptions {
            gender: Some(Gender::F),
            ..Default::default()
        };
        assert_eq!(
            assemble_row(&raw("Ali", "50.00"), &refs(), &options),
            RowOutcome::Filtered
        );
    }

    #[test]
    fn test_best_times_only() {
        let options = TableOptions {
            best_times_only: true,
            ..Default::default()
        };
        let rows = vec![raw("Ali", "59.50"), raw("Ali", "58.90"), raw("Abu", "1:00.00")];
        let report = assemble(rows, Vec::new(), &refs(), &options);
        assert_eq!(report.rows.len(), 2);
        let ali: Vec<_> = report.rows.iter().filter(|r| r.name == "Ali").collect();
        assert_eq!(ali.len(), 1);
        assert_eq!(ali[0].time.to_string(), "58.90");
    }

    #[test]
    fn test_excluded_foreign_swimmer_leaves_no_failure() {
        let options = TableOptions {
            include_foreign: false,
            ..Default::default()
        };
        let report = assemble(vec![raw("John Smith", "DQ")], Vec::new(), &refs(), &options);
        assert!(report.rows.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(report.summary.rows_excluded, 0);
    }

    #[test]
    fn test_state_filtered_row_leaves_no_failure() {
        let options = TableOptions {
            state: Some("JOH".to_string()),
            ..Default::default()
        };
        let mut bad_birthdate = raw("Abu", "50.00");
        bad_birthdate.birthdate = RawDate::Empty;
        let report = assemble(
            vec![raw("Ali", "DQ"), bad_birthdate],
            Vec::new(),
            &refs(),
            &options,
        );
        assert!(report.rows.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(report.summary, TableSummary::default());
    }

    #[test]
    fn test_best_times_counts_missing_target_once() {
        let options = TableOptions {
            best_times_only: true,
            ..Default::default()
        };
        let rows: Vec<RawRow> = ["59.50", "58.90"]
            .iter()
            .map(|time| {
                let mut input = raw("Ali", time);
                input.birthdate = RawDate::Text("2006-01-01".to_string());
                input
            })
            .collect();
        let report = assemble(rows, Vec::new(), &refs(), &options);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.summary.missing_targets, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, FailureKind::MissingTarget);
    }

    #[test]
    fn test_implausible_time_excluded() {
        assert!(matches!(
            assemble_row(&raw("Ali", "0.01"), &refs(), &TableOptions::default()),
            RowOutcome::Failed(Failure { kind: FailureKind::TimeUnparsable, .. })
        ));
    }

    #[test]
    fn test_best_times_tie_keeps_first() {
        let mut first = raw("Ali", "58.90");
        first.meet = "MIAG".to_string();
        let second = raw("Ali", "58.90");
        let options = TableOptions {
            best_times_only: true,
            ..Default::default()
        };
        let report = assemble(vec![first, second], Vec::new(), &refs(), &options);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].meet, "MIAG");
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let options = TableOptions {
            sort: Some(SortSpec::new(SortColumn::Time)),
            ..Default::default()
        };
        let input = vec![
            raw("C", "52.00"),
            raw("A", "50.00"),
            raw("B", "50.00"),
            raw("D", "DNS"),
        ];
        let first = assemble(input.clone(), Vec::new(), &refs(), &options);
        let second = assemble(input, Vec::new(), &refs(), &options);
        assert_eq!(first, second);
        let names: Vec<_> = first.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(first.summary.rows_excluded, 1);
    }
}
