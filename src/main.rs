use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

mod config;
mod diagnostics;
mod error;
mod handler;
mod http;
mod logger;
mod server;

use error::ServeError;
use server::{Server, ShutdownSignal};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logger::log_startup_error(&err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn run() -> Result<(), ServeError> {
    // Validated before anything else so a bad argument never binds a socket
    let port_arg = std::env::args().nth(1);
    let port_override = config::parse_port_arg(port_arg.as_deref())?;

    let cfg = config::Config::load(port_override)?;
    logger::init(&cfg.logging).map_err(ServeError::Logger)?;
    let settings = config::ServerSettings::from_config(&cfg)?;

    // Worker count defaults to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = settings.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(settings))?;
    // In-flight connections are abandoned rather than drained
    runtime.shutdown_timeout(Duration::from_secs(1));

    logger::log_shutdown();
    Ok(())
}

async fn async_main(settings: config::ServerSettings) -> Result<(), ServeError> {
    let server = Server::bind(settings)?;
    let addr = server.local_addr()?;

    let shutdown = Arc::new(ShutdownSignal::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    let settings = server.settings();
    diagnostics::print_startup(addr, &settings.root, &settings.required_assets);

    server.run(shutdown).await;
    Ok(())
}
