//! On Track 目標タイム計算
//!
//! 競技結果ワークブックを読み込み、ターゲットタイムとの差をポイントで示す表を作る。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod reader;
pub mod reference;
pub mod server;
pub mod table;
