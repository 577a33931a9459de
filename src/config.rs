use clap::{ArgAction, Parser};
use std::env;
use std::fmt;

pub const ACCESS_KEY_ID_VAR: &str = "ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VAR: &str = "SECRET_ACCESS_KEY";

/// Command-line flags. Credentials are not flags; they come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "s3-gateway",
    version,
    about = "A wrapper around S3 compatible object storages",
    after_help = "Provide ACCESS_KEY_ID and SECRET_ACCESS_KEY as environment variables"
)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 4132)]
    pub port: u16,

    /// Specifies interface to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: String,

    /// S3 endpoint to fetch objects from, as host[:port]
    #[arg(long = "s3.endpoint")]
    pub s3_endpoint: String,

    /// Specify to use SSL with S3
    #[arg(
        long = "s3.useSSL",
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub s3_use_ssl: bool,

    /// Region used when signing requests
    #[arg(long = "s3.region", default_value = "us-east-1")]
    pub s3_region: String,

    /// Address buckets as a path segment instead of a subdomain
    #[arg(
        long = "s3.pathStyle",
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub s3_path_style: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingEnv(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub bind: String,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[derive(Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub use_ssl: bool,
    pub region: String,
    pub path_style: bool,
    pub access_key_id: String,
    pub secret_access_key: String,
}

// The secret never reaches the logs.
impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint", &self.endpoint)
            .field("use_ssl", &self.use_ssl)
            .field("region", &self.region)
            .field("path_style", &self.path_style)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Parse the process arguments and read credentials from the environment,
    /// after loading an optional `.env` file.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        Self::from_parts(cli, |name| env::var(name).ok())
    }

    /// Build the configuration with an explicit environment lookup.
    pub fn from_parts<F>(cli: Cli, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key_id =
            lookup(ACCESS_KEY_ID_VAR).ok_or(ConfigError::MissingEnv(ACCESS_KEY_ID_VAR))?;
        let secret_access_key =
            lookup(SECRET_ACCESS_KEY_VAR).ok_or(ConfigError::MissingEnv(SECRET_ACCESS_KEY_VAR))?;

        Ok(Self {
            server: ServerConfig {
                port: cli.port,
                bind: cli.bind,
            },
            storage: StorageConfig {
                endpoint: cli.s3_endpoint,
                use_ssl: cli.s3_use_ssl,
                region: cli.s3_region,
                path_style: cli.s3_path_style,
                access_key_id,
                secret_access_key,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn credentials() -> HashMap<&'static str, String> {
        HashMap::from([
            (ACCESS_KEY_ID_VAR, "minio".to_string()),
            (SECRET_ACCESS_KEY_VAR, "minio-secret".to_string()),
        ])
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("s3-gateway").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--s3.endpoint", "localhost:9000"]);
        assert_eq!(cli.port, 4132);
        assert_eq!(cli.bind, "127.0.0.1");
        assert!(cli.s3_use_ssl);
        assert!(cli.s3_path_style);
        assert_eq!(cli.s3_region, "us-east-1");
    }

    #[test]
    fn test_endpoint_is_required() {
        let result = Cli::try_parse_from(["s3-gateway", "--port", "8080"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_use_ssl_forms() {
        assert!(!parse(&["--s3.endpoint", "h", "--s3.useSSL=false"]).s3_use_ssl);
        assert!(!parse(&["--s3.endpoint", "h", "--s3.useSSL", "false"]).s3_use_ssl);
        assert!(parse(&["--s3.endpoint", "h", "--s3.useSSL"]).s3_use_ssl);
    }

    #[test]
    fn test_credentials_from_environment() {
        let env = credentials();
        let cli = parse(&["--s3.endpoint", "localhost:9000", "--port", "8080", "--bind", "0.0.0.0"]);
        let config = Config::from_parts(cli, |name| env.get(name).cloned()).unwrap();

        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.storage.endpoint, "localhost:9000");
        assert_eq!(config.storage.access_key_id, "minio");
        assert_eq!(config.storage.secret_access_key, "minio-secret");
    }

    #[test]
    fn test_missing_access_key_is_named() {
        let mut env = credentials();
        env.remove(ACCESS_KEY_ID_VAR);
        let cli = parse(&["--s3.endpoint", "localhost:9000"]);
        let err = Config::from_parts(cli, |name| env.get(name).cloned()).unwrap_err();

        assert!(matches!(err, ConfigError::MissingEnv(ACCESS_KEY_ID_VAR)));
        assert_eq!(err.to_string(), "ACCESS_KEY_ID environment variable not set");
    }

    #[test]
    fn test_missing_secret_is_named() {
        let mut env = credentials();
        env.remove(SECRET_ACCESS_KEY_VAR);
        let cli = parse(&["--s3.endpoint", "localhost:9000"]);
        let err = Config::from_parts(cli, |name| env.get(name).cloned()).unwrap_err();

        assert_eq!(err.to_string(), "SECRET_ACCESS_KEY environment variable not set");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let env = credentials();
        let cli = parse(&["--s3.endpoint", "localhost:9000"]);
        let config = Config::from_parts(cli, |name| env.get(name).cloned()).unwrap();

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("minio-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
