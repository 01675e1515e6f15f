//! Subcommand handlers. Each returns the process exit code.

use super::commands::{AnalyzeArgs, ConfigArgs, ReportArgs};
use super::output::OutputFormatter;
use crate::analysis::{AnalysisReport, FeasibilityAnalyzer, StepClassifier};
use crate::cache::{CacheKey, ResultCache};
use crate::config::FeasibilityConfig;
use crate::progress::{LoggingHandler, ProgressBarHandler, ProgressHandler};
use crate::report::{load_json_report, write_json_report, write_steps_csv, write_summary_csv};
use crate::sheet::read_test_cases;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub async fn handle_analyze(args: &AnalyzeArgs, config: FeasibilityConfig, quiet: bool) -> i32 {
    match run_analyze(args, config, quiet).await {
        Ok(()) => 0,
        Err(e) => {
            debug!("Analysis failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

pub async fn handle_report(args: &ReportArgs) -> i32 {
    match run_report(args) {
        Ok(()) => 0,
        Err(e) => {
            debug!("Report failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

pub async fn handle_config(args: &ConfigArgs, config: &FeasibilityConfig) -> i32 {
    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_config(config) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

/// Applies the analyze flags on top of the environment-derived configuration.
fn config_from_args(args: &AnalyzeArgs, mut config: FeasibilityConfig) -> FeasibilityConfig {
    if let Some(provider) = args.provider {
        config.provider = provider;
    }
    if let Some(ref model) = args.model {
        config.model = model.clone();
    }
    if let Some(ref sheet) = args.sheet {
        config.sheet = sheet.clone();
    }
    if let Some(pool_size) = args.pool_size {
        config.pool_size = pool_size;
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    if args.strict {
        config.strict_vocabulary = true;
    }
    if args.no_cache {
        config.cache_enabled = false;
    }

    config
}

async fn run_analyze(args: &AnalyzeArgs, config: FeasibilityConfig, quiet: bool) -> Result<()> {
    let config = config_from_args(args, config);
    config.validate()?;
    debug!("Effective configuration: {:?}", config);

    let cases = read_test_cases(&args.input, &config.sheet)?;
    info!(
        cases = cases.len(),
        "Loaded test cases from {}",
        args.input.display()
    );

    let cache = open_cache(&config);
    let key = if cache.is_some() {
        Some(CacheKey::for_input(&args.input, &config)?)
    } else {
        None
    };

    let cached = match (&cache, &key) {
        (Some(cache), Some(key)) if !args.refresh => cache.load(key).unwrap_or_else(|e| {
            warn!("Failed to read cached results: {:#}", e);
            None
        }),
        _ => None,
    };

    let report = match cached {
        Some(report) => {
            info!("Using cached results for {}", args.input.display());
            report
        }
        None => {
            let client = config.create_client()?;
            let classifier =
                StepClassifier::new(client).with_strict_vocabulary(config.strict_vocabulary);
            let analyzer = FeasibilityAnalyzer::new(classifier, config.pool_size)
                .with_progress(progress_handler(quiet));
            let report = analyzer.analyze(&cases).await;

            if let (Some(cache), Some(key)) = (&cache, &key) {
                match cache.store(key, &report) {
                    Ok(true) => debug!("Cached results for {}", args.input.display()),
                    Ok(false) => {}
                    Err(e) => warn!("Failed to cache results: {:#}", e),
                }
            }
            report
        }
    };

    write_exports(args, &report)?;

    let formatter = OutputFormatter::new(args.format.into());
    let output = formatter.format_analysis(&report)?;
    emit(&output, args.output.as_deref())
}

fn run_report(args: &ReportArgs) -> Result<()> {
    let cases = load_json_report(&args.report)?;
    let formatter = OutputFormatter::new(args.format.into());

    let output = match args.case_id {
        Some(ref id) => {
            let case = cases
                .iter()
                .find(|c| &c.id == id)
                .with_context(|| format!("Test case '{}' not found in report", id))?;
            formatter.format_report_case(case)?
        }
        None => formatter.format_report_index(&cases)?,
    };

    println!("{}", output);
    Ok(())
}

fn open_cache(config: &FeasibilityConfig) -> Option<ResultCache> {
    let dir = config.active_cache_dir()?;
    match ResultCache::new(dir) {
        Ok(cache) => {
            debug!("Using result cache at {}", cache.dir().display());
            Some(cache)
        }
        Err(e) => {
            warn!("Result cache unavailable: {:#}", e);
            None
        }
    }
}

fn progress_handler(quiet: bool) -> Arc<dyn ProgressHandler> {
    if !quiet && atty::is(atty::Stream::Stderr) {
        Arc::new(ProgressBarHandler::new())
    } else {
        Arc::new(LoggingHandler)
    }
}

fn write_exports(args: &AnalyzeArgs, report: &AnalysisReport) -> Result<()> {
    if let Some(ref path) = args.steps_csv {
        write_steps_csv(report, create_file(path)?)?;
        info!("Wrote step results to {}", path.display());
    }
    if let Some(ref path) = args.summary_csv {
        write_summary_csv(report, create_file(path)?)?;
        info!("Wrote test case summary to {}", path.display());
    }
    if let Some(ref path) = args.json_report {
        write_json_report(report, path)?;
        info!("Wrote JSON report to {}", path.display());
    }
    Ok(())
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn emit(output: &str, destination: Option<&Path>) -> Result<()> {
    match destination {
        Some(path) => {
            std::fs::write(path, output)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            info!("Wrote output to {}", path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}
