//! greetpipe: a tiny greeting job runner.
//!
//! The library provides the greeting builder, the output-counting wrapper
//! step, and the YAML job host that runs them; the `greetpipe` binary is a
//! thin front end over [`job::run_job`].

pub mod cli;
pub mod console;
pub mod counter;
pub mod greeter;
pub mod job;
pub mod util;
pub mod work;

pub use counter::GreetingCounter;
pub use greeter::{check_name, greet, Greeter, GreetingRequest, NameValidation};
pub use work::{ShellWork, Work};
