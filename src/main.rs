use clap::Parser;
use ontrack_common::TableReport;
use ontrack_rust::{cli, config, error, export, reference, server, table};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use table::TableQuery;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn compute(config: &Config, query: TableQuery) -> Result<TableReport> {
    let request = query.parse()?;

    println!("[1/2] 参照データを読み込み中...");
    let refs = reference::load_reference_data(config)?;
    println!("✔ ターゲット {}件 / 基準タイム {}件\n", refs.targets.len(), refs.base_times.len());

    println!("[2/2] 結果ワークブックを集計中...");
    let report = table::build_table(config, &refs, &request)?;
    println!("✔ {}行\n", report.summary.rows);

    Ok(report)
}

fn print_table(report: &TableReport) {
    println!(
        "{:>4}  {:<28} {:<6} {:>3}  {:<10} {:<8} {:>9} {:>6} {:>9} {:>6} {:>6}",
        "Pos", "Name", "Team", "Age", "Event", "Meet", "Time", "Score", "Target", "TScore", "Diff"
    );
    let opt = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    for row in &report.rows {
        println!(
            "{:>4}  {:<28} {:<6} {:>3}  {:<10} {:<8} {:>9} {:>6} {:>9} {:>6} {:>6}",
            opt(row.place.map(|p| p.to_string())),
            row.name,
            row.team,
            row.age,
            row.event.label(),
            row.meet,
            row.time.to_string(),
            opt(row.score.map(|s| s.to_string())),
            opt(row.target_time.map(|t| t.to_string())),
            opt(row.target_score.map(|s| s.to_string())),
            opt(row.difference.map(|d| d.to_string())),
        );
    }
}

fn print_failures(report: &TableReport) {
    if report.failures.is_empty() {
        return;
    }
    let s = &report.summary;
    println!(
        "\n⚠ 失敗 {}件（ファイル {} / 除外行 {} / ターゲット無し {}）",
        report.failures.len(),
        s.files_failed,
        s.rows_excluded,
        s.missing_targets
    );
    for failure in &report.failures {
        println!("  {}", failure);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = match (&cli.command, cli.config.as_deref()) {
        (Commands::Config { init: true, .. }, Some(path)) if !path.exists() => Config::default(),
        (_, path) => load_config(path)?,
    };

    match cli.command {
        Commands::Serve { port } => {
            println!("🏊 ontrack - テーブルサーバ\n");

            println!("- 参照データを読み込み中...");
            let refs = reference::load_reference_data(&config)?;
            println!("✔ ターゲット {}件 / 基準タイム {}件", refs.targets.len(), refs.base_times.len());

            let port = port.unwrap_or(config.port);
            server::run(server::AppState::new(config, refs), port).await?;
        }

        Commands::Table { filters, json } => {
            if json {
                let request = TableQuery::from(filters).parse()?;
                let refs = reference::load_reference_data(&config)?;
                let report = table::build_table(&config, &refs, &request)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("🏊 ontrack - 結果テーブル\n");
                let report = compute(&config, filters.into())?;
                print_table(&report);
                print_failures(&report);
            }
        }

        Commands::Export { filters, output } => {
            println!("📄 ontrack - エクスポート\n");
            let report = compute(&config, filters.into())?;

            println!("- Excelを生成中...");
            export::write_report(&report, &output)?;
            println!("✔ Excel出力: {}", output.display());
            print_failures(&report);
        }

        Commands::Config { show, init } => {
            let path = match &cli.config {
                Some(path) => path.clone(),
                None => Config::config_path()?,
            };

            if init {
                if path.exists() {
                    return Err(error::OnTrackError::Config(format!(
                        "既に存在します: {}",
                        path.display()
                    )));
                }
                Config::default().save_to(&path)?;
                println!("✔ 設定ファイルを作成: {}", path.display());
            }

            if show || !init {
                println!("設定ファイル: {}", path.display());
                println!("  データフォルダ: {}", config.data_dir.display());
                println!("  参照ワークブック: {}", config.reference.path.display());
                println!("  エイリアス: {}", config.alias_preset);
                println!("  ポート: {}", config.port);
                println!("  大会:");
                for source in &config.sources {
                    println!("    {} ({}): {}", source.meet, source.gender, source.path.display());
                }
            }
        }
    }

    Ok(())
}
