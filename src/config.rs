use crate::error::{env_error, ArchiveResult, Error};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;

/// Default GraphQL endpoint for the Meetup API
pub const DEFAULT_ENDPOINT: &str = "https://api.meetup.com/gql";

/// Default number of events requested per page
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Default sentinel host identity whose events are excluded from the archive
pub const DEFAULT_EXCLUDED_HOST: &str = "Former member";

/// Main configuration structure for the archiver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bearer token for the API
    pub api_token: String,
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Events requested per page
    pub page_size: usize,
    /// Host display name whose events are filtered out
    pub excluded_host: String,
    /// Directory the JSON/HTML outputs are written to
    pub output_dir: String,
}

impl Config {
    /// Load configuration from the environment
    pub fn load() -> ArchiveResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let api_token = env::var("MEETUP_API_TOKEN").map_err(|_| env_error("MEETUP_API_TOKEN"))?;

        let endpoint =
            env::var("MEETUP_GRAPHQL_ENDPOINT").unwrap_or_else(|_| String::from(DEFAULT_ENDPOINT));

        let page_size = match env::var("ARCHIVE_PAGE_SIZE") {
            Ok(raw) => raw.parse::<usize>().map_err(|_| {
                Error::Environment(format!("Invalid ARCHIVE_PAGE_SIZE value: {}", raw))
            })?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        let excluded_host =
            env::var("EXCLUDED_HOST").unwrap_or_else(|_| String::from(DEFAULT_EXCLUDED_HOST));

        let output_dir = env::var("OUTPUT_DIR").unwrap_or_else(|_| String::from("."));

        Ok(Config {
            api_token,
            endpoint,
            page_size,
            excluded_host,
            output_dir,
        })
    }
}
