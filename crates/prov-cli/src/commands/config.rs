use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `prov config`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config()?;
    output(&config.redacted(), flags.format)
}
