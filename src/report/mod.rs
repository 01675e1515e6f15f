//! Report artifacts: delimited-text exports, the nested JSON report and
//! distribution statistics

mod export;
mod nested;
mod stats;

pub use export::{write_steps_csv, write_summary_csv, StepRow, SummaryRow};
pub use nested::{load_json_report, nest_report, write_json_report, ReportCase};
pub use stats::{count_values, Distribution, StepStatistics};
