mod app;
mod formatting;
mod ui;

use std::env;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    if env::args().len() > 1 {
        eprintln!(
            "PromptLens es interactivo y no acepta argumentos. Ejecuta solo `cargo run` o el binario sin parámetros."
        );
        std::process::exit(1);
    }

    init_logging();

    if let Err(message) = app::run() {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

/// Nivel `warn` salvo que `RUST_LOG` indique otro.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}
