use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::Context;
use tracing::warn;

use crate::greeter::{check_name, NameValidation};

/// Job and StepDef with Serialize + Deserialize so we can read & write YAML
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Job {
    pub name: Option<String>,
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<StepDef>,
}

/// One step of a job. Steps are tagged by kind in the YAML:
///
/// ```yaml
/// steps:
///   - say_hello:
///       name: Jesse
///   - count_greetings:
///       name: Jesse
///       body:
///         - say_hello:
///             name: Jesse
///             use_french: true
///   - sh:
///       run: echo done
/// ```
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "snake_case")]
pub enum StepDef {
    SayHello {
        name: String,
        #[serde(default)]
        use_french: bool,
    },
    CountGreetings {
        name: String,
        body: Vec<StepDef>,
    },
    Sh {
        run: String,
    },
}

/// Load YAML file into Job
pub fn load_job(path: &Path) -> anyhow::Result<Job> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    let job: Job = serde_yaml::from_str(&content).with_context(|| format!("failed to parse YAML {:?}", path))?;
    Ok(job)
}

/// Validate names before anything runs: an empty name aborts the job, a short
/// name only logs a warning.
pub fn validate_job(job: &Job) -> anyhow::Result<()> {
    validate_steps(&job.steps)
}

fn validate_steps(steps: &[StepDef]) -> anyhow::Result<()> {
    for step in steps {
        match step {
            StepDef::SayHello { name, .. } => checked_name(name)?,
            StepDef::CountGreetings { name, body } => {
                checked_name(name)?;
                validate_steps(body)?;
            }
            StepDef::Sh { run } => {
                if run.trim().is_empty() {
                    anyhow::bail!("sh step has an empty command");
                }
            }
        }
    }
    Ok(())
}

fn checked_name(name: &str) -> anyhow::Result<()> {
    match check_name(name) {
        NameValidation::Ok => Ok(()),
        NameValidation::Warning(msg) => {
            warn!("name {:?}: {}", name, msg);
            Ok(())
        }
        NameValidation::Error(msg) => anyhow::bail!("invalid step name {:?}: {}", name, msg),
    }
}

/// Helper: validate job file path (for main)
pub fn validate_job_file(path: &Path) -> anyhow::Result<()> {
    let job = load_job(path)?;
    validate_job(&job)?;
    println!("Job '{}' validated", job.name.clone().unwrap_or_else(|| "<unnamed>".to_string()));
    Ok(())
}
