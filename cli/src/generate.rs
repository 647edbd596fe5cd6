#![deny(missing_docs)]

//! # Generate Command
//!
//! Runs the full pipeline and prints the access key the client must use.

use crate::args::ProjectArgs;
use std::path::PathBuf;
use strapi_gen_core::{
    run_generate, AppResult, ClientLanguage, GenerateRequest, TokenSource, DEFAULT_TOKEN_ENV,
};

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    #[clap(flatten)]
    pub project: ProjectArgs,

    /// Output file. Defaults to `strapi-client.<ts|js>`.
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Client language: `ts` or `js`.
    #[clap(long, default_value = "ts")]
    pub target: ClientLanguage,

    /// Reuse this access key instead of minting a new one. It must match the stored hash.
    #[clap(long, env = "STRAPI_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Write the access key into the generated file.
    #[clap(long)]
    pub embed_token: bool,

    /// Environment variable the generated client reads the key from.
    #[clap(long, default_value = DEFAULT_TOKEN_ENV)]
    pub token_env: String,
}

impl GenerateArgs {
    /// Builds the pipeline request.
    pub fn request(&self) -> GenerateRequest {
        let output = self.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "strapi-client.{}",
                self.target.target().file_extension()
            ))
        });
        GenerateRequest {
            project: self.project.project(),
            output,
            language: self.target,
            token_source: match &self.access_key {
                Some(key) => TokenSource::Existing(key.clone()),
                None => TokenSource::Rotate,
            },
            embed_token: self.embed_token,
            token_env: self.token_env.clone(),
        }
    }
}

/// Executes the generation.
pub fn execute(args: &GenerateArgs) -> AppResult<()> {
    let report = run_generate(&args.request())?;

    for (uid, actions) in &report.content_types {
        let names: Vec<&str> = actions.iter().map(|a| a.as_str()).collect();
        tracing::info!(content_type = %uid, actions = %names.join(","), "generated");
    }
    if report.rotated {
        tracing::info!(token = %report.token.name, "stored hash replaced; previous key is revoked");
    }
    tracing::info!(output = ?report.output, "done");

    println!("{}", report.access_key);
    Ok(())
}
