#![deny(missing_docs)]

//! # strapi-gen
//!
//! Command Line Interface for generating Strapi REST clients.
//!
//! Supported Commands:
//! - `generate`: DB token -> minted key -> permissions -> schemas -> client file.
//! - `mint`: Rotates the token's access key and prints it.
//! - `inspect`: Lists the content types and actions a token can reach.

use clap::{ArgAction, Parser, Subcommand};
use strapi_gen_core::AppResult;

mod args;
mod generate;
mod inspect;
mod logging;
mod mint;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Strapi REST client generator")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mint a token and write a client with one function per permitted action.
    Generate(generate::GenerateArgs),
    /// Rotate the token's access key only.
    Mint(mint::MintArgs),
    /// Show what the token can access, without writing anything.
    Inspect(inspect::InspectArgs),
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
        Commands::Mint(args) => mint::execute(args)?,
        Commands::Inspect(args) => inspect::execute(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_verbosity() {
        let cli = Cli::try_parse_from(["strapi-gen", "inspect", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Inspect(_)));
    }
}
