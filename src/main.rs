//! Bank ledger CLI
//!
//! # Usage
//!
//! ```bash
//! cargo run                                          # interactive menu
//! cargo run -- script.csv > accounts.csv
//! cargo run -- --backend shared script.csv > accounts.csv
//! cargo run -- --report history --log-level info script.csv > history.csv
//! ```
//!
//! With a script, every command is replayed in order and the selected report is
//! written to stdout. Without one, the numbered menu runs on stdin/stdout. Logs
//! go to stderr; `RUST_LOG` overrides `--log-level`.
//!
//! # Exit Codes
//!
//! - 0: Success (declined commands do not change the exit code)
//! - 1: The script could not be read or the output could not be written

use bank_ledger::{cli, session};
use std::io;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let args = cli::parse_args();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut ledger = session::create_ledger(args.backend);

    let result = match &args.script {
        Some(script) => {
            let mut output = io::stdout().lock();
            session::run_script(ledger.as_mut(), script, args.report, &mut output).map(|_| ())
        }
        None => session::run_menu(ledger.as_mut(), io::stdin().lock(), io::stdout().lock()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
