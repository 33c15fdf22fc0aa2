pub mod config;
pub mod extract;
pub mod lookup;
pub mod regulated;
pub mod schema;

use crate::cli::{Commands, GlobalFlags};

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Lookup(args) => lookup::handle(&args, flags).await,
        Commands::Extract(args) => extract::handle(&args, flags),
        Commands::Regulated(args) => regulated::handle(&args, flags),
        Commands::Schema => schema::handle(flags),
        Commands::Config => config::handle(flags),
    }
}
