use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Default filter directive for a `-v`/`-q` balance.
pub fn default_directive(verbose: u8, quiet: u8) -> &'static str {
    match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber: stderr always, plus `log_file` when given.
///
/// `RUST_LOG` wins over the flags when set.
pub fn init(verbose: u8, quiet: u8, log_file: Option<&Path>) -> Result<(), i32> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                eprintln!("Error: cannot open log file {}: {e}", path.display());
                1
            })?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .boxed(),
            )
        }
        None => None,
    };

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();
    if let Err(e) = result {
        eprintln!("Error: failed to install logger: {e}");
        return Err(1);
    }
    Ok(())
}
