#![forbid(unsafe_code)]

//! DeptGate binary entry point.

use std::env;
use std::sync::Arc;

use deptgate::app::AppModel;
use deptgate::cli;
use deptgate::identity_store::FileIdentityStore;
use deptgate::item_source::HttpItemSource;
use deptgate_core::logging::{self, LogConfig};
use deptgate_runtime::{Program, ProgramConfig};

fn main() {
    let opts = cli::Opts::parse();

    let log_config = LogConfig {
        file: opts.log_file.clone(),
        filter: env::var("DEPTGATE_LOG").ok(),
    };
    if let Err(e) = logging::init(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    let store = FileIdentityStore::new(opts.resolved_store_path());
    let source = match HttpItemSource::new(opts.endpoint.clone(), opts.timeout()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        store = %store.path().display(),
        endpoint = %source.endpoint(),
        start = opts.start.name(),
        "starting deptgate"
    );

    let model =
        AppModel::new(Arc::new(store), Arc::new(source)).with_initial_route(opts.start);
    let config = if opts.inline {
        ProgramConfig::inline()
    } else {
        ProgramConfig::default()
    };

    match Program::new(model, config) {
        Ok(program) => {
            if let Err(e) = program.run() {
                tracing::error!(error = %e, "runtime error");
                eprintln!("Runtime error: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Failed to initialize: {e}");
            std::process::exit(1);
        }
    }
}
