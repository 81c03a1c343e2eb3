//! CLI command implementations.

pub mod analyze;
pub mod clean;

use storelens::PipelineConfig;

use crate::cli::ConfigArgs;

/// Configuration from `--config`, or the defaults.
pub(crate) fn load_config(args: &ConfigArgs) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    match &args.config {
        Some(path) => Ok(PipelineConfig::load(path)?),
        None => Ok(PipelineConfig::default()),
    }
}
