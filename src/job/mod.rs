pub mod executor;
pub mod parser;

pub use executor::run_job;
pub use parser::{load_job, validate_job, validate_job_file, Job, StepDef};
