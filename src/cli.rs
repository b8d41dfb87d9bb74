use crate::table::TableQuery;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ontrack")]
#[command(about = "On Track 目標タイム計算・競技結果テーブル", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（デフォルト: ~/.config/ontrack/config.json）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// HTTPで結果テーブルを提供
    Serve {
        /// ポート番号（省略時は設定値）
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// 結果テーブルを計算して表示
    Table {
        #[command(flatten)]
        filters: FilterArgs,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 結果テーブルと失敗サマリーをExcelに出力
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// 出力ファイル（.xlsx）
        #[arg(short, long, required = true)]
        output: PathBuf,
    },

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定の設定ファイルを書き出す
        #[arg(long)]
        init: bool,
    },
}

/// 絞り込み・ソート条件
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// 大会コード（カンマ区切り）
    #[arg(short, long)]
    pub meets: Option<String>,

    /// 性別 (M/F)
    #[arg(short, long)]
    pub gender: Option<String>,

    /// 州コード（例: SEL）
    #[arg(short, long)]
    pub state: Option<String>,

    /// 種目（カンマ区切り、例: "100 Free,200 IM"）
    #[arg(short, long)]
    pub events: Option<String>,

    /// 外国籍選手を除外
    #[arg(long)]
    pub exclude_foreign: bool,

    /// 選手・種目ごとのベストタイムのみ
    #[arg(short, long)]
    pub best_times_only: bool,

    /// ソート列 (place/time/score/difference/age/name)
    #[arg(long)]
    pub sort: Option<String>,

    /// ソート方向 (asc/desc、省略時は列の既定)
    #[arg(long)]
    pub direction: Option<String>,
}

impl From<FilterArgs> for TableQuery {
    fn from(args: FilterArgs) -> Self {
        TableQuery {
            meets: args.meets,
            gender: args.gender,
            state: args.state,
            events: args.events,
            include_foreign: Some(!args.exclude_foreign),
            best_times_only: Some(args.best_times_only),
            sort: args.sort,
            direction: args.direction,
        }
    }
}
