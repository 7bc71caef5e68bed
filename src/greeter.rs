//! The "say hello" step and its configuration-time validation.

use std::io::Write;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::work::Work;

/// One greeting invocation: who to greet and in which language.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GreetingRequest {
    pub name: String,
    #[serde(default)]
    pub use_french: bool,
}

/// Write exactly one greeting line for `request` to the console.
pub fn greet(request: &GreetingRequest, console: &mut (dyn Write + Send)) -> anyhow::Result<()> {
    if request.use_french {
        writeln!(console, "Bonjour, {}!", request.name)?;
    } else {
        writeln!(console, "Hello, {}!", request.name)?;
    }
    Ok(())
}

/// Work adapter around one greeting request, so a greeting can run on its own
/// or inside a counted body.
pub struct Greeter {
    request: GreetingRequest,
}

impl Greeter {
    pub fn new(request: GreetingRequest) -> Self {
        Self { request }
    }
}

#[async_trait]
impl Work for Greeter {
    async fn run(&mut self, console: &mut (dyn Write + Send)) -> anyhow::Result<()> {
        greet(&self.request, console)
    }
}

/// Outcome of configuration-time name validation. An error blocks the job
/// from loading; a warning is advisory and never stops execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameValidation {
    Ok,
    Warning(&'static str),
    Error(&'static str),
}

/// Advisory validation for the `name` field of a greeting or counting step.
pub fn check_name(value: &str) -> NameValidation {
    if value.is_empty() {
        return NameValidation::Error("Please set a name");
    }
    if value.chars().count() < 4 {
        return NameValidation::Warning("Isn't the name too short?");
    }
    NameValidation::Ok
}
