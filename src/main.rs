use std::sync::Arc;

use sessiontron::config::{load_config, print_schema};
use sessiontron::startup;
use sessiontron::utils::logger::init_logging;
use tracing::error;

#[tokio::main]
async fn main() {
    if std::env::args().skip(1).any(|arg| arg == "--schema") {
        if let Err(e) = print_schema() {
            eprintln!("Error printing schema: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = Arc::new(load_config());
    init_logging(&config.logging);

    if let Err(e) = startup::run(config).await {
        error!("sessiontron stopped: {}", e);
        std::process::exit(1);
    }
}
