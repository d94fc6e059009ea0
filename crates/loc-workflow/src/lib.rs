pub mod history;
pub mod report;
pub mod runner;

pub use history::{RunJournal, RunRecord};
pub use report::{build_report, label_histogram, ReconReport, SuperGroup};
pub use runner::{run, RunOptions, RunSummary};
