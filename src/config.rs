//! CLI arguments and relay configuration defaults.

use clap::Parser;
use clap::builder::FalseyValueParser;
use shadow_rs::formatcp;

use crate::build;
use crate::drive::OAuthCredentials;

const VERSION_INFO: &str = formatcp!(
    r#"{}\ncommit_hash: {}\nbuild_time: {}\nbuild_env: {},{}"#,
    build::PKG_VERSION,
    build::SHORT_COMMIT,
    build::BUILD_TIME,
    build::RUST_VERSION,
    build::RUST_CHANNEL
);

pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;
/// Room for multipart boundaries, part headers and the `path` field.
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;
pub const FILE_FIELD: &str = "file";
pub const PATH_FIELD: &str = "path";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ROOT_FOLDER_ID: &str = "root";
pub const DEFAULT_CORS_ORIGINS: &str =
    "https://www.lespresources.in,http://localhost:5173,http://localhost:4173";
pub const DEFAULT_DRIVE_API_URL: &str = "https://www.googleapis.com";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const SHUTDOWN_GRACE_SECS: u64 = 10;

/// CLI arguments and environment configuration for the relay.
#[derive(Parser, Debug)]
#[command(name = "drive-relay", version = VERSION_INFO, about = "Google Drive upload relay")]
pub struct Args {
    #[arg(long, env = "GOOGLE_CLIENT_ID", help = "OAuth client id")]
    pub client_id: String,
    #[arg(long, env = "GOOGLE_CLIENT_SECRET", help = "OAuth client secret")]
    pub client_secret: String,
    #[arg(long, env = "REDIRECT_URI", help = "OAuth redirect URI")]
    pub redirect_uri: Option<String>,
    #[arg(long, env = "GOOGLE_REFRESH_TOKEN", help = "OAuth refresh token")]
    pub refresh_token: String,
    #[arg(
        short = 'b',
        long,
        env = "RELAY_BIND",
        default_value = "0.0.0.0",
        help = "Bind address"
    )]
    pub host: String,
    #[arg(
        short = 'p',
        long,
        env = "PORT",
        default_value_t = DEFAULT_PORT,
        help = "HTTP port"
    )]
    pub port: u16,
    #[arg(
        long,
        env = "VERCEL",
        value_parser = FalseyValueParser::new(),
        help = "Run under an external host instead of listening"
    )]
    pub hosted: bool,
    #[arg(
        long,
        env = "RELAY_CORS_ORIGINS",
        default_value = DEFAULT_CORS_ORIGINS,
        help = "Comma separated CORS origins"
    )]
    pub cors_origins: String,
    #[arg(
        long,
        env = "RELAY_ROOT_FOLDER_ID",
        default_value = DEFAULT_ROOT_FOLDER_ID,
        help = "Drive folder that upload paths are resolved from"
    )]
    pub root_folder_id: String,
    #[arg(
        long,
        env = "RELAY_DRIVE_API_URL",
        default_value = DEFAULT_DRIVE_API_URL,
        help = "Drive API base URL"
    )]
    pub drive_api_url: String,
    #[arg(
        long,
        env = "RELAY_TOKEN_URL",
        default_value = DEFAULT_TOKEN_URL,
        help = "OAuth token endpoint"
    )]
    pub token_url: String,
}

impl Args {
    pub fn credentials(&self) -> OAuthCredentials {
        OAuthCredentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_uri: self.redirect_uri.clone().filter(|uri| !uri.is_empty()),
            refresh_token: self.refresh_token.clone(),
        }
    }
}
