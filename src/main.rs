use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*};

use greetpipe::cli::{self, Opts};
use greetpipe::job;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .init();

    match cli::get_opts() {
        Opts::Run { path } => {
            let path = std::path::Path::new(&path);
            job::run_job(path).await.context("job run failed")?;
        }
        Opts::Validate { path } => {
            job::validate_job_file(std::path::Path::new(&path))?;
        }
    }

    Ok(())
}
