use thiserror::Error;

#[derive(Error, Debug)]
pub enum OnTrackError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ワークブックを開けません: {path}: {reason}")]
    WorkbookOpen { path: String, reason: String },

    #[error("シートが見つかりません: {path} / {sheet}")]
    SheetNotFound { path: String, sheet: String },

    #[error("参照データが不正: {0}")]
    InvalidReference(String),

    #[error("不正なクエリ: {0}")]
    InvalidQuery(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(#[from] rust_xlsxwriter::XlsxError),

    #[error("HTTPサーバエラー: {0}")]
    Http(String),

    #[error(transparent)]
    Common(#[from] ontrack_common::Error),
}

pub type Result<T> = std::result::Result<T, OnTrackError>;
