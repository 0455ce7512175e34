// Docs Index - command line entry point

use clap::Parser;
use docs_index::commands::{execute, IndexArgs};
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, Registry};

fn main() {
    let args = IndexArgs::parse();
    init_tracing(args.verbose);

    let today = chrono::Local::now().date_naive();
    std::process::exit(execute(&args, today));
}

/// Log to stderr so stdout carries only the rendered index.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let subscriber = Registry::default().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false),
    );
    tracing::subscriber::set_global_default(subscriber).ok();
}
