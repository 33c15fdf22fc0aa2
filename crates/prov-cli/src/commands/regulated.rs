use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RegulatedArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RegulatedResponse<'a> {
    brand: &'a str,
    product: &'a str,
    regulated: bool,
}

/// Handle `prov regulated`.
pub fn handle(args: &RegulatedArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(
        &RegulatedResponse {
            brand: &args.brand,
            product: &args.product,
            regulated: prov_pipeline::is_regulated_brand(&args.brand, &args.product),
        },
        flags.format,
    )
}
