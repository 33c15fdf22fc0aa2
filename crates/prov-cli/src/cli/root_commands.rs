use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Determine who ultimately owns a product.
    Lookup(LookupArgs),
    /// Recover the embedded object from model-style text.
    Extract(ExtractArgs),
    /// Check whether a brand looks medical or otherwise regulated.
    Regulated(RegulatedArgs),
    /// Print the JSON Schema of the determination record.
    Schema,
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[derive(Clone, Debug, Args)]
pub struct LookupArgs {
    /// Product name as printed or known.
    #[arg(long)]
    pub product: Option<String>,

    /// Brand name as printed or known.
    #[arg(long)]
    pub brand: Option<String>,

    /// Packaging photo to analyse before research.
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Country of origin, used as a region hint.
    #[arg(long)]
    pub country: Option<String>,

    /// Your own confidence (0-100) in the product and brand given.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub manual_confidence: Option<u8>,
}

#[derive(Clone, Debug, Args)]
pub struct ExtractArgs {
    /// Read from this file instead of stdin.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct RegulatedArgs {
    #[arg(long)]
    pub brand: String,

    #[arg(long, default_value = "")]
    pub product: String,
}
