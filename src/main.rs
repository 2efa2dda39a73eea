//! Relay Latency Tester - command-line entry point

use clap::Parser;
use relay_latency_tester::{
    app::App,
    cli::{supports_color, Cli},
    config::EnvManager,
    error::{ErrorReporter, USAGE_EXIT_CODE},
};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    // .env must be loaded before parsing so clap's env fallbacks see it
    let debug = std::env::args().any(|arg| arg == "--debug");
    if let Err(e) = EnvManager::load_env_file(debug) {
        ErrorReporter::new(supports_color(), debug).report_error(&e);
        process::exit(e.exit_code());
    }

    let cli = Cli::parse();
    if let Err(message) = cli.validate() {
        eprintln!("error: {}", message);
        process::exit(USAGE_EXIT_CODE);
    }

    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);
    let result = match App::new(cli) {
        Ok(app) => app.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}
