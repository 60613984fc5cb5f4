//! Binary entrypoint: read one sprint-report JSON object from stdin, write metrics to stdout.
//!
//! On unreadable input an ErrorOutput object is written instead and the exit code is 1.

use std::io::{self, Write};

fn main() {
  if let Err(e) = sprint_metrics::run_stream(io::stdin().lock(), io::stdout().lock()) {
    let _ = sprint_metrics::write_error(io::stdout().lock(), &e);
    let _ = writeln!(io::stderr(), "sprint-metrics error: {}", e);
    std::process::exit(1);
  }
}
