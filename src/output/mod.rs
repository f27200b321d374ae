//! Output format writers.

mod csv;
mod json;
mod progress;

pub use csv::write_csv;
pub use json::{JsonResultFile, JsonSettings, JsonSummary};
pub use progress::{
    create_file_progress, create_stage_spinner, finish_progress, inc_progress, set_stage,
};
