use rayon::ThreadPoolBuilder;
use anyhow::Result;
use log::{error, info};
use crate::errors::BuildError;
use crate::initialization::init;
use crate::worker::run;

mod config;
mod errors;
mod initialization;
mod logging;
mod manager_series;
pub mod models;
mod tmy;
mod worker;

fn main() -> Result<()> {
    // Load config and set up managers. If initialization fails we can't even log.
    let (config, mgr) = match init() {
        Ok((c, m)) => (c, m),
        Err(e) => {
            return Err(BuildError(format!("Initialization failed: {}", e)))?;
        }
    };

    ThreadPoolBuilder::new().num_threads(config.general.threads).build_global()?;

    // Build the typical meteorological year
    match run(&mgr, &config.files) {
        Ok(_) => {
            info!("Successfully built typical meteorological year");
        },
        Err(e) => {
            error!("Run failed: {}", e);
            return Err(e)?;
        }
    }

    Ok(())
}
