use std::env;

/// Parsed command line. The binary stays small on purpose: one verb and a
/// job file.
pub enum Opts {
    Run { path: String },
    Validate { path: String },
}

pub fn get_opts() -> Opts {
    let mut args = env::args().skip(1);
    let verb = args.next().unwrap_or_else(|| usage());
    let path = args.next().unwrap_or_else(|| usage());
    match verb.as_str() {
        "run" => Opts::Run { path },
        "validate" => Opts::Validate { path },
        other => {
            eprintln!("Unknown subcommand: {} (supported: run, validate)", other);
            std::process::exit(1);
        }
    }
}

fn usage() -> ! {
    eprintln!("Usage: greetpipe <run|validate> <job.yaml>");
    std::process::exit(1);
}
