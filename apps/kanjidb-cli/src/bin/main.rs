use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kanjidb_analysis::{
    sort_rows, to_csv, to_json, write_atomic, AnalysisReport, ComponentAnalyzer, ExportFormat, SortDirection, SortKey,
};
use kanjidb_core::config::{Config, Settings};
use kanjidb_core::{CharacterStore, SourceKind};

#[derive(Parser)]
#[command(name = "kanjidb", version, about = "Merge KanjiVG and KANJIDIC2, then predict component readings")]
struct Cli {
    /// KanjiVG XML file (overrides sources.kanjivg)
    #[arg(long, env = "KANJIDB_KANJIVG_FILE", global = true)]
    kanjivg: Option<PathBuf>,

    /// KANJIDIC2 XML file (overrides sources.kanjidic)
    #[arg(long, env = "KANJIDB_KANJIDIC_FILE", global = true)]
    kanjidic: Option<PathBuf>,

    /// Directory holding kanjidb.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict readings for every component and export the table
    Analyze {
        /// size | coverage | frequency
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        ascending: bool,
        /// csv | json
        #[arg(long)]
        format: Option<String>,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        precision: Option<u32>,
    },
    /// Show the predicted readings of one component
    Component {
        literal: String,
        #[arg(long)]
        precision: Option<u32>,
    },
    /// Print one merged character as JSON
    Lookup { literal: String },
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn source_path(flag: Option<PathBuf>, configured: Option<&String>, config: &Config, name: &str) -> Result<PathBuf> {
    match (flag, configured) {
        (Some(path), _) => Ok(path),
        (None, Some(path)) => Ok(config.resolve(path)),
        (None, None) => bail!("No {name} file given; pass --{name} or set sources.{name}"),
    }
}

fn load_store(cli_kanjivg: Option<PathBuf>, cli_kanjidic: Option<PathBuf>, config: &Config, settings: &Settings) -> Result<CharacterStore> {
    let kanjivg = source_path(cli_kanjivg, settings.sources.kanjivg.as_ref(), config, "kanjivg")?;
    let kanjidic = source_path(cli_kanjidic, settings.sources.kanjidic.as_ref(), config, "kanjidic")?;

    let mut store = CharacterStore::new();
    kanjidb_sources::load_file(&mut store, &kanjivg, SourceKind::KanjiVg)
        .with_context(|| format!("Failed to load {}", kanjivg.display()))?;
    kanjidb_sources::load_file(&mut store, &kanjidic, SourceKind::KanjiDic)
        .with_context(|| format!("Failed to load {}", kanjidic.display()))?;
    info!("Dictionary holds {} characters", store.len());
    Ok(store)
}

fn analyze_with_progress(store: &CharacterStore) -> Result<AnalysisReport> {
    let analyzer = ComponentAnalyzer::new(store);
    let components = store.all_components();
    let pb = ProgressBar::new(components.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} components ({percent}%) {msg}")?
            .progress_chars("#>-"),
    );
    let mut report = AnalysisReport::default();
    for component in components {
        report.absorb(analyzer.analyze(component));
        pb.inc(1);
    }
    pb.finish_and_clear();
    report.warn_missing();
    Ok(report)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_from(&cli.config_dir).context("Error loading config")?;
    let settings = config.settings()?;
    init_tracing(&settings.log.filter);

    let store = load_store(cli.kanjivg, cli.kanjidic, &config, &settings)?;

    match cli.command {
        Command::Analyze { sort, ascending, format, output, precision } => {
            let key: SortKey = sort.as_deref().unwrap_or(&settings.report.sort).parse()?;
            let direction = SortDirection::from_ascending(ascending || settings.report.ascending);
            let format: ExportFormat = format.as_deref().unwrap_or(&settings.report.format).parse()?;
            let precision = precision.unwrap_or(settings.report.precision);

            let mut report = analyze_with_progress(&store)?;
            sort_rows(&mut report.rows, key, direction);
            info!("{} rows over {} components", report.rows.len(), report.components);

            let rendered = match format {
                ExportFormat::Csv => to_csv(&report.rows, precision)?,
                ExportFormat::Json => to_json(&report.rows, precision)?,
            };
            let output = output.or_else(|| settings.report.output.as_ref().map(|p| config.resolve(p)));
            match output {
                Some(path) => {
                    write_atomic(&path, &rendered)?;
                    info!("Wrote table to {}", path.display());
                }
                None => print!("{rendered}"),
            }
        }
        Command::Component { literal, precision } => {
            let analysis = ComponentAnalyzer::new(&store).analyze(&literal);
            let rows = analysis.rows.clone();
            let mut report = AnalysisReport::default();
            report.absorb(analysis);
            report.warn_missing();
            if rows.is_empty() {
                warn!("No character containing '{}' has reading data", literal);
            } else {
                print!("{}", to_csv(&rows, precision.unwrap_or(settings.report.precision))?);
            }
        }
        Command::Lookup { literal } => match store.get(&literal) {
            Some(character) => println!("{}", serde_json::to_string_pretty(character)?),
            None => bail!("'{}' does not exist within the dictionary", literal),
        },
    }
    Ok(())
}
