use prov_core::entities::OwnershipDetermination;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `prov schema`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = schemars::schema_for!(OwnershipDetermination);
    output(&schema, flags.format)
}
