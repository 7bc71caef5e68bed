use crate::counter::GreetingCounter;
use crate::greeter::{greet, GreetingRequest};
use crate::job::parser::{load_job, validate_job, StepDef};
use crate::util::{create_run_dir, timestamp, write_artifact};
use crate::work::{ShellWork, Work};
use async_trait::async_trait;
use chrono::Utc;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Public entry used by main.rs
pub async fn run_job(path: &Path) -> anyhow::Result<()> {
    run_job_in(path, Path::new(".greetpipe")).await
}

async fn run_job_in(path: &Path, base: &Path) -> anyhow::Result<()> {
    let job = load_job(path)?;
    validate_job(&job)?;

    info!("Starting job: {:?}", job.name);

    // create run dir for artifacts
    let run_dir = create_run_dir(base)?;
    let meta_file = run_dir.join("job.yaml");
    std::fs::write(&meta_file, serde_yaml::to_string(&job)?)?;

    let mut transcript: Vec<u8> = Vec::new();
    let result = run_steps(&job.steps, &mut transcript).await;

    // The console transcript is echoed and archived whether or not the job
    // succeeded.
    std::io::stdout().write_all(&transcript)?;

    let ts = timestamp();
    write_artifact(&run_dir, &format!("console_{}.log", ts), &transcript)?;
    let meta = json!({
        "job": job.name,
        "completed": result.is_ok(),
        "timestamp": Utc::now().to_rfc3339(),
    });
    write_artifact(&run_dir, &format!("result_{}.json", ts), meta.to_string().as_bytes())?;

    result?;
    info!("Job finished");
    Ok(())
}

/// Run steps in order against one console, stopping at the first failure.
fn run_steps<'a>(
    steps: &'a [StepDef],
    console: &'a mut (dyn Write + Send),
) -> BoxFuture<'a, anyhow::Result<()>> {
    async move {
        for step in steps {
            match step {
                StepDef::SayHello { name, use_french } => {
                    let request = GreetingRequest {
                        name: name.clone(),
                        use_french: *use_french,
                    };
                    greet(&request, console)?;
                }
                StepDef::CountGreetings { name, body } => {
                    let counter = GreetingCounter::new(name.as_str())?;
                    let mut work = StepsWork { steps: body };
                    let count = counter.run(&mut work, &mut *console).await?;
                    writeln!(console, "greeted {} times", count)?;
                }
                StepDef::Sh { run } => {
                    ShellWork::new(run.as_str()).run(console).await?;
                }
            }
        }
        Ok(())
    }
    .boxed()
}

/// Lets a list of steps stand in as the body of a wrapping step.
struct StepsWork<'a> {
    steps: &'a [StepDef],
}

#[async_trait]
impl Work for StepsWork<'_> {
    async fn run(&mut self, console: &mut (dyn Write + Send)) -> anyhow::Result<()> {
        run_steps(self.steps, console).await
    }
}
