use std::env;
use std::path::PathBuf;

use therapy_dashboard::{app, DashboardConfig};

/// Entry point for the dashboard server.
///
/// Optional positional arguments override the deployment defaults:
/// `dashboard [bind_address] [workbook_path]`.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config = DashboardConfig::default();
    if args.len() >= 2 {
        config.bind_address = args[1].clone();
    }
    if args.len() >= 3 {
        config.workbook_path = PathBuf::from(&args[2]);
    }

    app::run(config).await
}
