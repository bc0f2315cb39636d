use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::review::ReviewError;
use crate::store::StoreError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Review(#[from] ReviewError),

    /// A hook settled with an error.
    #[error("{source}")]
    #[diagnostic(code(community_admin::cli::fetch_failed))]
    Fetch {
        #[source]
        source: Arc<StoreError>,
    },

    #[error("Invalid argument: {message}")]
    #[diagnostic(code(community_admin::cli::invalid_argument))]
    InvalidArgument { message: String },

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(community_admin::cli::render))]
    Render(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;
