//! CLI entry point for grademaster.
//!
//! Provides subcommands for projecting course grades from a gradebook CSV,
//! mapping a single percentage to a letter, and listing the grade scale.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use grademaster::config::ReportConfig;
use grademaster::engine;
use grademaster::message::MessageComposer;
use grademaster::output::{
    RunSummary, print_json, write_messages, write_projections, write_rank_file, write_summary,
};
use grademaster::parser::read_gradebook;
use grademaster::stats::ClassStatistics;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "grademaster")]
#[command(about = "Course grade projections and class statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project final grades from a gradebook CSV and write the reports
    Project {
        /// Gradebook CSV: identity columns followed by HW1.., M1, M2, Final
        #[arg(value_name = "DATA_FILE")]
        data_file: String,

        /// Directory for projections.csv, rankfile.txt, messagefile.txt, summary.json
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// JSON report config (course, signature, meeting threshold, grade scale)
        #[arg(short, long)]
        config: Option<String>,

        /// Offer a meeting to students projected below the threshold
        #[arg(long, default_value_t = false)]
        request_meeting: bool,
    },
    /// Map a percentage to its letter grade
    Letter {
        #[arg(allow_negative_numbers = true)]
        percent: f64,

        #[arg(short, long)]
        config: Option<String>,
    },
    /// List the active grade scale
    Scale {
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/grademaster.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("grademaster.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Project {
            data_file,
            output_dir,
            config,
            request_meeting,
        } => {
            let config = ReportConfig::load_or_default(config.as_deref())?;
            project(&data_file, &output_dir, &config, request_meeting)?;
        }
        Commands::Letter { percent, config } => {
            let scale = ReportConfig::load_or_default(config.as_deref())?.grade_scale()?;
            let letter = scale.letter_grade(percent);
            info!(percent, letter, "Letter grade");
            println!("{letter}");
        }
        Commands::Scale { config } => {
            let scale = ReportConfig::load_or_default(config.as_deref())?.grade_scale()?;
            for b in scale.brackets() {
                info!(letter = %b.letter, low = b.low, high = b.high, "Bracket");
            }
            info!(
                below = scale.lowest_passing(),
                letter = engine::grade::FAILING_GRADE,
                "Failing grade"
            );
        }
    }

    Ok(())
}

/// Loads the gradebook, runs the engine, and writes every report.
#[tracing::instrument(skip(config), fields(output_dir = %output_dir.display()))]
fn project(
    data_file: &str,
    output_dir: &Path,
    config: &ReportConfig,
    request_meeting: bool,
) -> Result<()> {
    let started = Instant::now();
    let scale = config.grade_scale()?;

    info!("Starting data acquisition");
    let table = read_gradebook(data_file)?;

    info!("Starting calculation of grades and grade projections");
    let output = engine::run(&table);
    for warning in &output.warnings {
        warn!(%warning, "Projection warning");
    }

    info!("Starting calculation of course statistics");
    let statistics = ClassStatistics::compute(&table, &output.projections);
    if let Some(ranking) = &statistics.ranking {
        info!(
            top = %ranking.top.full_name(),
            bottom = %ranking.bottom.full_name(),
            column = %ranking.column,
            "Class ranking"
        );
    }

    let composer = MessageComposer::new(
        config,
        &scale,
        &statistics,
        output.progress.update_number(),
        request_meeting,
    );
    let messages = composer.compose_all(&table, &output.projections);

    std::fs::create_dir_all(output_dir)?;
    write_projections(&output_dir.join("projections.csv"), &table, &output, &scale)?;
    write_rank_file(&output_dir.join("rankfile.txt"), statistics.ranking.as_ref())?;
    write_messages(&output_dir.join("messagefile.txt"), &messages)?;
    let summary = RunSummary::new(&output, &statistics);
    write_summary(&output_dir.join("summary.json"), &summary)?;
    print_json(&summary)?;

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Code finished successfully"
    );
    Ok(())
}
