use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{DisabledGenerator, FinancialDataGenerator, ProcessGenerator};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Shared living expense and wishlist server", long_about = None)]
pub struct ServerConfig {
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:roomloot.db",
        help = "SQLite database URL, e.g. 'sqlite:roomloot.db'. The file is created if missing."
    )]
    pub database_url: String,

    #[arg(long, env = "BIND_ADDRESS", default_value = "127.0.0.1:3000")]
    pub bind_address: String,

    #[arg(
        long,
        env = "CORS_ORIGIN",
        default_value = "http://localhost:8080",
        help = "Origin allowed to call the API from a browser"
    )]
    pub cors_origin: String,

    #[arg(
        long,
        env = "FINANCIAL_DATA_GENERATOR",
        help = "Program run as '<program> [args] <user_id> <output_path>' to produce financial data. Generation is disabled when unset."
    )]
    pub generator_program: Option<PathBuf>,

    #[arg(
        long = "generator-arg",
        help = "Extra leading argument for the generator program, e.g. a script path. Repeatable."
    )]
    pub generator_args: Vec<String>,

    #[arg(
        long,
        help = "Directory the generator writes its output file to. Defaults to the system temp dir."
    )]
    pub generator_output_dir: Option<PathBuf>,

    #[arg(
        long,
        help = "Seconds to wait for the generator before giving up. Waits indefinitely when unset."
    )]
    pub generator_timeout_secs: Option<u64>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The generator described by the configuration
    pub fn financial_data_generator(&self) -> Arc<dyn FinancialDataGenerator> {
        match &self.generator_program {
            Some(program) => Arc::new(ProcessGenerator::new(
                program.clone(),
                self.generator_args.clone(),
                self.generator_output_dir
                    .clone()
                    .unwrap_or_else(std::env::temp_dir),
                self.generator_timeout_secs.map(Duration::from_secs),
            )),
            None => Arc::new(DisabledGenerator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["roomloot-server"]).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.cors_origin, "http://localhost:8080");
        assert!(config.generator_args.is_empty());
        assert!(config.generator_timeout_secs.is_none());
    }

    #[test]
    fn test_generator_arguments() {
        let config = ServerConfig::try_parse_from([
            "roomloot-server",
            "--generator-program",
            "python3",
            "--generator-arg",
            "api/generate_user_financial_data.py",
            "--generator-timeout-secs",
            "30",
        ])
        .unwrap();
        assert_eq!(config.generator_program, Some(PathBuf::from("python3")));
        assert_eq!(config.generator_args, vec!["api/generate_user_financial_data.py"]);
        assert_eq!(config.generator_timeout_secs, Some(30));
    }
}
