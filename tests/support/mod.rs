//! テスト用ワークブックの生成

#![allow(dead_code)]

use ontrack_common::Gender;
use ontrack_rust::config::{Config, MeetSource, ReferenceConfig};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// セル値
pub enum Cell {
    S(&'static str),
    N(f64),
    Blank,
}

use self::Cell::{Blank, N, S};

pub const RESULT_HEADER: [&str; 11] = [
    "Gender", "Distance", "Stroke", "Name", "Birthdate", "Time", "Seconds", "Points", "Place",
    "Meet Date", "Team",
];

pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<Cell>>)]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    S(text) => {
                        sheet.write_string(r as u32, c as u16, *text).unwrap();
                    }
                    N(value) => {
                        sheet.write_number(r as u32, c as u16, *value).unwrap();
                    }
                    Blank => {}
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

fn header() -> Vec<Cell> {
    RESULT_HEADER.iter().map(|h| S(*h)).collect()
}

pub fn result_row(
    gender: &'static str,
    name: &'static str,
    birthdate: Cell,
    time: Cell,
    place: f64,
    meet_date: &'static str,
    team: &'static str,
) -> Vec<Cell> {
    vec![
        S(gender),
        N(100.0),
        S("Free"),
        S(name),
        birthdate,
        time,
        Blank,
        Blank,
        N(place),
        S(meet_date),
        S(team),
    ]
}

/// ターゲット表と基準タイム表
pub fn write_reference(path: &Path) {
    write_workbook(
        path,
        &[
            (
                "Target Times",
                vec![
                    vec![S("Gender"), S("Event"), S("Age"), S("Target")],
                    vec![S("M"), S("100 Free"), N(16.0), S("52.00")],
                    vec![S("F"), S("100 Free"), N(16.0), S("58.00")],
                    vec![S("M"), S("50 Free"), N(16.0), N(24.0)],
                    vec![S("M"), S("100 Crawl"), N(16.0), S("55.00")],
                ],
            ),
            (
                "Base Times",
                vec![
                    vec![S("Gender"), S("50 Free"), S("100 Free")],
                    vec![S("M"), N(21.0), N(48.0)],
                    vec![S("F"), N(24.0), S("53.00")],
                ],
            ),
        ],
    );
}

/// SUKMA 男子: 通常シート + 除外対象シート
pub fn write_sukma_boys(path: &Path) {
    write_workbook(
        path,
        &[
            (
                "Boys 100 Free",
                vec![
                    header(),
                    result_row("M", "Ahmad Bin Ali", S("2008-05-01"), S("58.90"), 1.0, "2024-09-15", "Selangor"),
                    result_row("M", "Lim Wei", S("2009-03-02"), S("1:00.10"), 2.0, "2024-09-15", "Johor"),
                    result_row("M", "John Smith", S("2008-01-01"), S("59.00"), 3.0, "2024-09-15", "Sabah"),
                    result_row("M", "Bad Time", S("2008-01-01"), S("DQ"), 5.0, "2024-09-15", "Perak"),
                    result_row("", "", Blank, Blank, 0.0, "", ""),
                    result_row("M", "Tan Ah Kow", N(39569.0), N(59.5), 4.0, "15/09/2024", "JOH"),
                ],
            ),
            (
                "4x100 Free Relay",
                vec![header(), result_row("M", "Relay Team", S("bad"), S("bad"), 1.0, "bad", "SEL")],
            ),
            (
                "Lap Splits",
                vec![header(), result_row("M", "Lap Row", S("bad"), S("bad"), 1.0, "bad", "SEL")],
            ),
        ],
    );
}

/// SUKMA 女子
pub fn write_sukma_girls(path: &Path) {
    write_workbook(
        path,
        &[(
            "Girls 100 Free",
            vec![
                header(),
                result_row("F", "Siti Aminah", S("2008-07-07"), S("1:02.00"), 1.0, "2024-09-15", "Kuala Lumpur"),
            ],
        )],
    );
}

/// 参照データ・SUKMA男女・存在しないMIAGを持つデータフォルダ
pub fn sample_config(dir: &Path) -> Config {
    write_reference(&dir.join("reference.xlsx"));
    write_sukma_boys(&dir.join("sukma_m.xlsx"));
    write_sukma_girls(&dir.join("sukma_f.xlsx"));
    std::fs::write(dir.join("foreign.txt"), "# foreign swimmers\nJohn Smith\n").unwrap();

    Config {
        data_dir: dir.to_path_buf(),
        sources: vec![
            source("SUKMA", Gender::M, "sukma_m.xlsx"),
            source("SUKMA", Gender::F, "sukma_f.xlsx"),
            source("MIAG", Gender::M, "miag_m.xlsx"),
        ],
        reference: ReferenceConfig {
            path: PathBuf::from("reference.xlsx"),
            ..ReferenceConfig::default()
        },
        foreign_file: Some(PathBuf::from("foreign.txt")),
        ..Config::default()
    }
}

pub fn source(meet: &str, gender: Gender, path: &str) -> MeetSource {
    MeetSource {
        meet: meet.to_string(),
        gender,
        path: PathBuf::from(path),
    }
}
