//! The "count greetings" step: runs a unit of work while tallying a name in
//! its console output.

use std::io::Write;

use anyhow::Context;
use regex::bytes::Regex;
use tracing::debug;

use crate::console::LineScanner;
use crate::work::Work;

/// Counts non-overlapping literal occurrences of a target name in the console
/// output of a wrapped unit of work, bolding each occurrence as it passes
/// through.
///
/// Every call to [`run`](GreetingCounter::run) is its own session: the count
/// starts at zero, grows only while the work emits lines, and is reported once
/// the work completes. Concurrent sessions share nothing.
pub struct GreetingCounter {
    target: String,
    pattern: Regex,
}

impl GreetingCounter {
    /// Build a counter for `target`. The target is matched as literal text;
    /// pattern metacharacters have no special meaning. An empty target is
    /// rejected.
    pub fn new(target: impl Into<String>) -> anyhow::Result<Self> {
        let target = target.into();
        if target.is_empty() {
            anyhow::bail!("count target must not be empty");
        }
        let pattern = Regex::new(&regex::escape(&target))
            .with_context(|| format!("failed to compile pattern for {:?}", target))?;
        Ok(Self { target, pattern })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Run `work` with its console output intercepted line by line before it
    /// reaches `sink`, and return the final occurrence count once the work
    /// completes.
    ///
    /// A failing work has its error returned unchanged and the partial count
    /// is discarded; output emitted before the failure still reaches the sink.
    pub async fn run<W>(&self, work: &mut dyn Work, sink: W) -> anyhow::Result<u64>
    where
        W: Write + Send,
    {
        debug!("counting occurrences of {:?}", self.target);
        let mut scanner = LineScanner::new(self.pattern.clone(), sink);
        let result = work.run(&mut scanner).await;
        let flushed = scanner.finish();
        result?;
        let count = flushed.context("failed to flush console output")?;
        debug!("counted {} occurrence(s) of {:?}", count, self.target);
        Ok(count)
    }
}
