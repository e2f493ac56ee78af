use std::io;
use std::process;
use std::time::Duration;

use clap::Parser;
use stream_ripper_lib::cli::CliArgs;
use stream_ripper_lib::finish;
use tracing::{error, Level};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Time to read the startup error before the window closes
const FATAL_EXIT_DELAY: Duration = Duration::from_secs(5);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliArgs::parse();
    init_logging(args.verbose);
    let config = args.into_config();

    let result = stream_ripper_lib::run(&config).await;
    if let Err(e) = &result {
        if e.is_fatal() {
            println!("{}", e);
            error!(error = %e, "startup check failed");
            tokio::time::sleep(FATAL_EXIT_DELAY).await;
            process::exit(1);
        }
    }

    let code = finish(
        &result,
        config.wait_for_key,
        &mut io::stdin().lock(),
        &mut io::stdout(),
    );
    if code != 0 {
        process::exit(code);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(verbose),
        )
        .with(filter)
        .init();
}
