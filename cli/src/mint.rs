//! # Mint Command
//!
//! Rotates the access key without generating a client.

use crate::args::ProjectArgs;
use strapi_gen_core::{mint, AppResult};

/// Arguments for the mint command.
#[derive(clap::Args, Debug, Clone)]
pub struct MintArgs {
    #[clap(flatten)]
    pub project: ProjectArgs,
}

/// Rotates the key and prints it on stdout.
pub fn execute(args: &MintArgs) -> AppResult<()> {
    let (token, key) = mint(&args.project.project())?;
    tracing::info!(token = %token.name, kind = %token.kind, "previous key is revoked");
    println!("{}", key);
    Ok(())
}
