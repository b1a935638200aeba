//! Address Base Registry import binary.

use std::process::ExitCode;

use abr_importer::{run, ImporterConfig};
use abr_loader::AddressStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let result = ImporterConfig::from_env().and_then(|config| {
        let mut store = AddressStore::new();
        run(&config, &mut store)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
