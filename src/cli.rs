//! Command-line arguments and logging setup.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError, Edition};
use crate::sample::OnExisting;

/// IAM sample client for TypeDB
#[derive(Parser, Debug)]
#[command(
    name = "iam-sample",
    version,
    about = "Sample identity and access management client for TypeDB",
    long_about = "Creates the sample IAM database, loads its schema and data,\n\
                  checks the seeded users, then runs a handful of sample requests."
)]
pub struct Args {
    /// Server address (host:port)
    #[arg(short = 'a', long, env = "IAM_SAMPLE_ADDRESS")]
    pub address: Option<String>,

    /// Database name
    #[arg(short = 'd', long, env = "IAM_SAMPLE_DATABASE")]
    pub database: Option<String>,

    /// Server edition
    #[arg(short = 'e', long, env = "IAM_SAMPLE_EDITION")]
    pub edition: Option<Edition>,

    /// Cloud username
    #[arg(short = 'U', long, env = "IAM_SAMPLE_USERNAME")]
    pub username: Option<String>,

    /// Cloud password (use IAM_SAMPLE_PASSWORD env var for security)
    #[arg(short = 'W', long, env = "IAM_SAMPLE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Root CA certificate for Cloud TLS
    #[arg(long, value_name = "FILE")]
    pub tls_root_ca: Option<PathBuf>,

    /// Connect to Cloud without TLS
    #[arg(long)]
    pub no_tls: bool,

    /// Schema definition file
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Data insertion file
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Replace an existing database without asking
    #[arg(long)]
    pub reset: bool,

    /// Keep an existing database without asking
    #[arg(long, conflicts_with = "reset")]
    pub reuse: bool,

    /// Set up and check the database, skip the sample requests
    #[arg(long)]
    pub skip_queries: bool,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Args {
    /// Load the config file (explicit or default) and apply the arguments on top.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::load_default()?,
        };
        Ok(self.apply(config))
    }

    /// Override config values with the ones given on the command line.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(address) = &self.address {
            config.address = address.clone();
        }
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        if let Some(edition) = self.edition {
            config.edition = edition;
        }
        if let Some(username) = &self.username {
            config.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.password = Some(password.clone());
        }
        if let Some(ca) = &self.tls_root_ca {
            config.tls_root_ca = Some(ca.clone());
        }
        if self.no_tls {
            config.tls = false;
        }
        if let Some(schema) = &self.schema {
            config.schema_file = schema.clone();
        }
        if let Some(data) = &self.data {
            config.data_file = data.clone();
        }
        if self.reset {
            config.reset = true;
        }
        if self.reuse {
            config.reset = false;
        }
        if self.skip_queries {
            config.run_queries = false;
        }
        config
    }

    /// How to treat an existing database. `--reuse` wins over `reset` from the file.
    pub fn on_existing(&self, config: &AppConfig) -> OnExisting {
        if self.reuse {
            OnExisting::Reuse
        } else if config.reset {
            OnExisting::Replace
        } else {
            OnExisting::Prompt
        }
    }
}

/// Install the tracing subscriber. Verbose mode logs each query.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("iam_sample=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("iam_sample=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("iam-sample").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_flags_keeps_defaults() {
        let args = parse(&[]);
        let config = args.apply(AppConfig::default());
        assert_eq!(config, AppConfig::default());
        assert_eq!(args.on_existing(&config), OnExisting::Prompt);
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse(&[
            "--address",
            "db:1729",
            "--database",
            "iam",
            "--edition",
            "cloud",
            "--no-tls",
            "--schema",
            "resources/iam-schema.tql",
            "--skip-queries",
            "--reset",
        ]);
        let config = args.apply(AppConfig::default());

        assert_eq!(config.address, "db:1729");
        assert_eq!(config.database, "iam");
        assert_eq!(config.edition, Edition::Cloud);
        assert!(!config.tls);
        assert_eq!(config.schema_file, PathBuf::from("resources/iam-schema.tql"));
        assert!(!config.run_queries);
        assert_eq!(args.on_existing(&config), OnExisting::Replace);
    }

    #[test]
    fn test_reset_and_reuse_conflict() {
        let result = Args::try_parse_from(["iam-sample", "--reset", "--reuse"]);
        assert!(result.is_err());
        assert_eq!(parse(&["--reuse"]).on_existing(&AppConfig::default()), OnExisting::Reuse);
    }

    #[test]
    fn test_reset_from_config_file() {
        let args = parse(&[]);
        let config = args.apply(AppConfig::builder().reset(true).build());
        assert_eq!(args.on_existing(&config), OnExisting::Replace);
    }

    #[test]
    fn test_reuse_flag_beats_file_reset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "reset = true\n").unwrap();

        let args = parse(&["--config", path.to_str().unwrap(), "--reuse"]);
        let config = args.load_config().unwrap();

        assert!(!config.reset);
        assert_eq!(args.on_existing(&config), OnExisting::Reuse);
    }

    #[test]
    fn test_unknown_edition_rejected() {
        assert!(Args::try_parse_from(["iam-sample", "--edition", "enterprise"]).is_err());
    }
}
