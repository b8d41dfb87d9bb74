//! 読み込みから表の組み立てまでの統合テスト

mod support;

use ontrack_common::{FailureKind, Gender, SortColumn, SortSpec};
use ontrack_rust::reference::load_reference_data;
use ontrack_rust::table::{build_table, TableQuery, TableRequest};
use support::sample_config;
use tempfile::tempdir;

fn names(report: &ontrack_common::TableReport) -> Vec<&str> {
    report.rows.iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn test_full_table() {
    let dir = tempdir().unwrap();
    let config = sample_config(dir.path());
    let refs = load_reference_data(&config).unwrap();

    let report = build_table(&config, &refs, &TableRequest::default()).unwrap();

    assert_eq!(
        names(&report),
        vec!["Ahmad Bin Ali", "Siti Aminah", "Lim Wei", "John Smith *", "Tan Ah Kow"]
    );

    let ahmad = &report.rows[0];
    assert_eq!(ahmad.age, 16);
    assert_eq!(ahmad.team, "SEL");
    assert!(ahmad.team_resolved);
    assert_eq!(ahmad.time.to_string(), "58.90");
    assert_eq!(ahmad.score, Some(541));
    assert_eq!(ahmad.target_time.map(|t| t.to_string()), Some("52.00".to_string()));
    assert_eq!(ahmad.target_score, Some(786));
    assert_eq!(ahmad.difference, Some(-245));

    let siti = &report.rows[1];
    assert_eq!(siti.gender, Gender::F);
    assert_eq!(siti.team, "WPK");
    assert_eq!(siti.score, Some(624));
    assert_eq!(siti.target_score, Some(763));

    // ターゲット無し（15歳）でも行は残る
    let lim = &report.rows[2];
    assert_eq!(lim.age, 15);
    assert_eq!(lim.target_time, None);
    assert_eq!(lim.difference, None);
    assert_eq!(lim.score, Some(509));

    // シリアル値の生年月日・数値タイム
    let tan = &report.rows[4];
    assert_eq!(tan.age, 16);
    assert_eq!(tan.team, "JOH");
    assert_eq!(tan.score, Some(525));

    let kinds: Vec<FailureKind> = report.failures.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FailureKind::FileUnreadable,
            FailureKind::TimeUnparsable,
            FailureKind::MissingTarget,
        ]
    );
    assert!(report.failures[0].file.ends_with("miag_m.xlsx"));
    assert_eq!(report.failures[1].name.as_deref(), Some("Bad Time"));
    assert_eq!(report.failures[2].name.as_deref(), Some("Lim Wei"));
    assert_eq!(report.summary.rows, 5);
    assert_eq!(report.summary.files_failed, 1);
    assert_eq!(report.summary.rows_excluded, 1);
    assert_eq!(report.summary.missing_targets, 1);
}

#[test]
fn test_filters_and_sort() {
    let dir = tempdir().unwrap();
    let config = sample_config(dir.path());
    let refs = load_reference_data(&config).unwrap();

    let query = TableQuery {
        meets: Some("sukma".into()),
        gender: Some("M".into()),
        include_foreign: Some(false),
        sort: Some("score".into()),
        ..Default::default()
    };
    let report = build_table(&config, &refs, &query.parse().unwrap()).unwrap();

    // スコア降順、外国籍除外、MIAGは対象外なので失敗にならない
    assert_eq!(names(&report), vec!["Ahmad Bin Ali", "Tan Ah Kow", "Lim Wei"]);
    assert_eq!(report.summary.files_failed, 0);

    let query = TableQuery {
        state: Some("joh".into()),
        ..Default::default()
    };
    let report = build_table(&config, &refs, &query.parse().unwrap()).unwrap();
    assert_eq!(names(&report), vec!["Lim Wei", "Tan Ah Kow"]);

    // 州で除外された Perak の DQ 行は失敗にも数えない
    assert!(report
        .failures
        .iter()
        .all(|f| f.name.as_deref() != Some("Bad Time")));
    assert_eq!(report.summary.rows_excluded, 0);
}

#[test]
fn test_difference_sort_puts_missing_last() {
    let dir = tempdir().unwrap();
    let config = sample_config(dir.path());
    let refs = load_reference_data(&config).unwrap();

    let mut request = TableRequest::default();
    request.options.sort = Some(SortSpec::new(SortColumn::Difference));
    let report = build_table(&config, &refs, &request).unwrap();

    let diffs: Vec<Option<i64>> = report.rows.iter().map(|r| r.difference).collect();
    assert_eq!(diffs.last(), Some(&None));
    assert_eq!(diffs[0], Some(-139));
}

#[test]
fn test_deterministic() {
    let dir = tempdir().unwrap();
    let config = sample_config(dir.path());
    let refs = load_reference_data(&config).unwrap();

    let first = build_table(&config, &refs, &TableRequest::default()).unwrap();
    let second = build_table(&config, &refs, &TableRequest::default()).unwrap();
    assert_eq!(first, second);
}
