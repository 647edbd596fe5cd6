#![deny(missing_docs)]

//! # Shared Arguments
//!
//! Locating the Strapi project, shared by every command.

use std::path::PathBuf;
use strapi_gen_core::Project;

/// Where the Strapi project lives and which token to use.
#[derive(clap::Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Root of the Strapi project (the directory holding `src/api`).
    #[clap(long, env = "STRAPI_PROJECT_ROOT", default_value = ".")]
    pub project_root: PathBuf,

    /// Name of the API token, as shown in the admin panel.
    #[clap(long, env = "STRAPI_TOKEN_NAME", default_value = "a2a-agent")]
    pub token_name: String,

    /// Origin the CMS is served from.
    #[clap(long, env = "STRAPI_ORIGIN", default_value = "http://localhost:1337")]
    pub origin: String,

    /// SQLite database. Defaults to `<project-root>/.tmp/data.db`.
    #[clap(long)]
    pub database: Option<PathBuf>,

    /// Env file holding `API_TOKEN_SALT`. Defaults to `<project-root>/.env`.
    #[clap(long)]
    pub env_file: Option<PathBuf>,
}

impl ProjectArgs {
    /// Resolves the defaults against the project root.
    pub fn project(&self) -> Project {
        let mut project =
            Project::with_defaults(&self.project_root, &self.token_name, &self.origin);
        if let Some(database) = &self.database {
            project.database = database.clone();
        }
        if let Some(env_file) = &self.env_file {
            project.env_file = env_file.clone();
        }
        project
    }
}
