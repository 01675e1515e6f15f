use clap::{Parser, Subcommand, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

/// LLM-assisted automation feasibility analysis for manual QA test cases
#[derive(Parser, Debug)]
#[command(
    name = "qa-feasibility",
    about = "LLM-assisted automation feasibility analysis for manual QA test cases",
    version,
    long_about = "qa-feasibility reads a spreadsheet of manual test cases, asks a language \
                  model whether each test step can be automated and with which tool \
                  (Selenium, Cypress, Appium or Manual), and summarizes the verdicts per \
                  test case. It supports multiple AI providers through genai (Ollama, OpenAI, \
                  Claude, Gemini, Grok, Groq) and several output formats."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Log level requested on the command line; `--log-level` wins over
    /// `--verbose` and `--quiet`.
    pub fn log_level_override(&self) -> Option<String> {
        if let Some(ref level) = self.log_level {
            Some(level.trim().to_lowercase())
        } else if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Analyze a spreadsheet of test cases",
        long_about = "Reads the test cases from a workbook (.xlsx, .xlsm, .xls, .xlsb, .ods) or CSV \
                      file, classifies every step through the configured model and prints \
                      the feasibility summary.\n\n\
                      Examples:\n  \
                      qa-feasibility analyze cases.xlsx\n  \
                      qa-feasibility analyze cases.xlsx --sheet Regression --pool-size 4\n  \
                      qa-feasibility analyze cases.csv --provider openai --model gpt-4o-mini\n  \
                      qa-feasibility analyze cases.xlsx --steps-csv steps.csv --json-report report.json"
    )]
    Analyze(AnalyzeArgs),

    #[command(
        about = "View a previously exported JSON report",
        long_about = "Loads a nested JSON report written by `analyze --json-report` and shows \
                      the statistics and step table for one test case. Without --case the \
                      available test case IDs are listed. No model calls are made.\n\n\
                      Examples:\n  \
                      qa-feasibility report report.json\n  \
                      qa-feasibility report report.json --case TC-001"
    )]
    Report(ReportArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(value_name = "FILE", help = "Spreadsheet of test cases")]
    pub input: PathBuf,

    #[arg(
        short = 's',
        long,
        value_name = "NAME",
        help = "Worksheet to read from workbook inputs (default: Sheet1)"
    )]
    pub sheet: Option<String>,

    #[arg(
        short = 'p',
        long,
        value_parser = parse_adapter_kind,
        help = "AI provider (default: ollama)"
    )]
    pub provider: Option<AdapterKind>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name to use (provider-specific, e.g., 'mistral' for Ollama)"
    )]
    pub model: Option<String>,

    #[arg(
        long,
        value_name = "N",
        help = "Concurrent model requests per test case (default: 2)"
    )]
    pub pool_size: Option<usize>,

    #[arg(long, value_name = "SECONDS", help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Record out-of-vocabulary model answers as errors")]
    pub strict: bool,

    #[arg(long, help = "Disable result caching")]
    pub no_cache: bool,

    #[arg(
        long,
        conflicts_with = "no_cache",
        help = "Ignore cached results and overwrite them"
    )]
    pub refresh: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, value_name = "FILE", help = "Write step-level results as CSV")]
    pub steps_csv: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Write the per-test-case summary as CSV")]
    pub summary_csv: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Write the nested JSON report")]
    pub json_report: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ReportArgs {
    #[arg(value_name = "JSON", help = "Nested JSON report to load")]
    pub report: PathBuf,

    #[arg(short = 'c', long = "case", value_name = "ID", help = "Test case to display")]
    pub case_id: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    crate::config::parse_provider(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_analyze_args() {
        let args = CliArgs::parse_from(["qa-feasibility", "analyze", "cases.xlsx"]);
        match args.command {
            Commands::Analyze(analyze) => {
                assert_eq!(analyze.input, PathBuf::from("cases.xlsx"));
                assert_eq!(analyze.format, OutputFormatArg::Human);
                assert!(analyze.sheet.is_none());
                assert!(analyze.provider.is_none());
                assert!(analyze.model.is_none());
                assert!(analyze.pool_size.is_none());
                assert!(analyze.timeout.is_none());
                assert!(!analyze.strict);
                assert!(!analyze.no_cache);
                assert!(!analyze.refresh);
                assert!(analyze.steps_csv.is_none());
                assert!(analyze.output.is_none());
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_analyze_with_options() {
        let args = CliArgs::parse_from([
            "qa-feasibility",
            "analyze",
            "cases.csv",
            "--sheet",
            "Regression",
            "--provider",
            "openai",
            "--model",
            "gpt-4o-mini",
            "--pool-size",
            "4",
            "--timeout",
            "30",
            "--strict",
            "--refresh",
            "--format",
            "json",
            "--steps-csv",
            "steps.csv",
            "--summary-csv",
            "summary.csv",
            "--json-report",
            "report.json",
        ]);

        match args.command {
            Commands::Analyze(analyze) => {
                assert_eq!(analyze.sheet.as_deref(), Some("Regression"));
                assert_eq!(analyze.provider, Some(AdapterKind::OpenAI));
                assert_eq!(analyze.model.as_deref(), Some("gpt-4o-mini"));
                assert_eq!(analyze.pool_size, Some(4));
                assert_eq!(analyze.timeout, Some(30));
                assert!(analyze.strict);
                assert!(analyze.refresh);
                assert_eq!(analyze.format, OutputFormatArg::Json);
                assert_eq!(analyze.steps_csv, Some(PathBuf::from("steps.csv")));
                assert_eq!(analyze.summary_csv, Some(PathBuf::from("summary.csv")));
                assert_eq!(analyze.json_report, Some(PathBuf::from("report.json")));
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_analyze_requires_input() {
        assert!(CliArgs::try_parse_from(["qa-feasibility", "analyze"]).is_err());
    }

    #[test]
    fn test_no_cache_conflicts_with_refresh() {
        let result = CliArgs::try_parse_from([
            "qa-feasibility",
            "analyze",
            "cases.xlsx",
            "--no-cache",
            "--refresh",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_report_command() {
        let args = CliArgs::parse_from(["qa-feasibility", "report", "out.json", "--case", "TC-7"]);
        match args.command {
            Commands::Report(report) => {
                assert_eq!(report.report, PathBuf::from("out.json"));
                assert_eq!(report.case_id.as_deref(), Some("TC-7"));
                assert_eq!(report.format, OutputFormatArg::Human);
            }
            _ => panic!("Expected Report command"),
        }
    }

    #[test]
    fn test_config_command() {
        let args = CliArgs::parse_from(["qa-feasibility", "config", "--format", "yaml"]);
        match args.command {
            Commands::Config(config) => assert_eq!(config.format, OutputFormatArg::Yaml),
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["qa-feasibility", "-v", "config"]);
        assert!(args.verbose);
        assert!(!args.quiet);

        let args = CliArgs::parse_from(["qa-feasibility", "config", "-q"]);
        assert!(args.quiet);

        let args = CliArgs::parse_from(["qa-feasibility", "--log-level", "debug", "config"]);
        assert_eq!(args.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_log_level_override() {
        let args = CliArgs::parse_from(["qa-feasibility", "config"]);
        assert_eq!(args.log_level_override(), None);

        let args = CliArgs::parse_from(["qa-feasibility", "-v", "config"]);
        assert_eq!(args.log_level_override().as_deref(), Some("debug"));

        let args = CliArgs::parse_from(["qa-feasibility", "-q", "config"]);
        assert_eq!(args.log_level_override().as_deref(), Some("error"));

        let args = CliArgs::parse_from(["qa-feasibility", "-q", "--log-level", "WARN", "config"]);
        assert_eq!(args.log_level_override().as_deref(), Some("warn"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CliArgs::try_parse_from(["qa-feasibility", "-v", "-q", "config"]).is_err());
    }

    #[test]
    fn test_adapter_kind_parsing() {
        assert!(parse_adapter_kind("ollama").is_ok());
        assert!(parse_adapter_kind("OpenAI").is_ok());
        assert!(parse_adapter_kind("anthropic").is_ok());
        assert!(parse_adapter_kind("gemini").is_ok());
        assert!(parse_adapter_kind("groq").is_ok());
        assert!(parse_adapter_kind("invalid").is_err());
    }
}
