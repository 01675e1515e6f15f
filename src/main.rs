use qa_feasibility::cli::commands::{CliArgs, Commands};
use qa_feasibility::cli::handlers::{handle_analyze, handle_config, handle_report};
use qa_feasibility::config::FeasibilityConfig;
use qa_feasibility::util::logging::{init_logging, LoggingConfig};
use qa_feasibility::VERSION;

use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let mut config = FeasibilityConfig::default();
    if let Some(level) = args.log_level_override() {
        config.log_level = level;
    }

    let level = match config.tracing_level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(LoggingConfig {
        use_json: config.log_json,
        ..LoggingConfig::with_level(level)
    });

    debug!("qa-feasibility v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Analyze(analyze_args) => handle_analyze(analyze_args, config, args.quiet).await,
        Commands::Report(report_args) => handle_report(report_args).await,
        Commands::Config(config_args) => handle_config(config_args, &config).await,
    };

    std::process::exit(exit_code);
}
