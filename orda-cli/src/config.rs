//! Runtime configuration.
//!
//! Every option can be given as a flag or through the environment. A
//! `.env` file in the working directory is loaded before parsing so its
//! values act as defaults.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Args;
use orda_simulation::InvestmentLimits;
use orda_store::MySqlSettings;
use secrecy::SecretString;

/// Loads `.env` if present. A missing file is not an error.
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct OpenAiConfig {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = orda_llm::OPENAI_BASE_URL)]
    pub openai_base_url: String,

    #[arg(long, env = "OPENAI_EMBEDDING_MODEL", default_value = orda_embeddings::DEFAULT_EMBEDDING_MODEL)]
    pub openai_embedding_model: String,
}

impl OpenAiConfig {
    pub fn api_key(&self) -> anyhow::Result<SecretString> {
        required_secret(&self.openai_api_key, "OPENAI_API_KEY")
    }
}

#[derive(Debug, Clone, Args)]
pub struct PineconeConfig {
    #[arg(long, env = "PINECONE_API_KEY", hide_env_values = true)]
    pub pinecone_api_key: Option<String>,

    #[arg(long, env = "PINECONE_INDEX_NAME", default_value = "ordaproject")]
    pub pinecone_index_name: String,

    #[arg(long, env = "PINECONE_CONTROL_URL", default_value = orda_pinecone::PINECONE_CONTROL_URL)]
    pub pinecone_control_url: String,
}

impl PineconeConfig {
    pub fn api_key(&self) -> anyhow::Result<SecretString> {
        required_secret(&self.pinecone_api_key, "PINECONE_API_KEY")
    }
}

#[derive(Debug, Clone, Args)]
pub struct MySqlConfig {
    #[arg(long, env = "MYSQL_HOST", default_value = "localhost")]
    pub mysql_host: String,

    #[arg(long, env = "MYSQL_PORT", default_value_t = 3308)]
    pub mysql_port: u16,

    #[arg(long, env = "MYSQL_USER", default_value = "root")]
    pub mysql_user: String,

    #[arg(long, env = "MYSQL_PASSWORD", default_value = "password", hide_env_values = true)]
    pub mysql_password: String,

    #[arg(long, env = "MYSQL_DATABASE", default_value = "orda_db")]
    pub mysql_database: String,
}

impl MySqlConfig {
    pub fn settings(&self) -> MySqlSettings {
        MySqlSettings {
            host: self.mysql_host.clone(),
            port: self.mysql_port,
            user: self.mysql_user.clone(),
            password: SecretString::new(self.mysql_password.clone()),
            database: self.mysql_database.clone(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PipelineConfig {
    /// Minutes between scheduled pipeline runs.
    #[arg(long = "schedule-minutes", env = "PIPELINE_SCHEDULE_MINUTES", default_value_t = 30)]
    pub schedule_minutes: u64,

    #[arg(long, env = "PIPELINE_ISSUES_PER_CATEGORY", default_value_t = orda_pipeline::DEFAULT_ISSUES_PER_CATEGORY)]
    pub issues_per_category: usize,

    #[arg(long, env = "PIPELINE_TARGET_FILTERED_COUNT", default_value_t = orda_pipeline::DEFAULT_TARGET_FILTERED)]
    pub target_filtered_count: usize,

    /// Seconds before a BigKinds request gives up.
    #[arg(long, env = "CRAWLING_TIMEOUT", default_value_t = 30)]
    pub crawling_timeout: u64,

    #[arg(long, env = "BIGKINDS_BASE_URL", default_value = orda_news::DEFAULT_BIGKINDS_URL)]
    pub bigkinds_base_url: String,
}

impl PipelineConfig {
    pub fn interval(&self) -> anyhow::Result<Duration> {
        if self.schedule_minutes == 0 {
            bail!("PIPELINE_SCHEDULE_MINUTES must be at least 1");
        }
        Ok(Duration::from_secs(self.schedule_minutes * 60))
    }
}

#[derive(Debug, Clone, Args)]
pub struct SimulationConfig {
    #[arg(long, env = "SIMULATION_MIN_INVESTMENT", default_value_t = 10_000.0)]
    pub min_investment: f64,

    #[arg(long, env = "SIMULATION_MAX_INVESTMENT", default_value_t = 100_000_000.0)]
    pub max_investment: f64,
}

impl SimulationConfig {
    pub fn limits(&self) -> anyhow::Result<InvestmentLimits> {
        if self.min_investment < 0.0 || self.min_investment > self.max_investment {
            bail!(
                "invalid investment range {}..{}",
                self.min_investment,
                self.max_investment
            );
        }
        Ok(InvestmentLimits {
            min_total: self.min_investment,
            max_total: self.max_investment,
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct PathsConfig {
    /// Directory holding the industry and past-news CSV files.
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory for crawl output and pipeline result files.
    #[arg(long, env = "RESULTS_DIR", default_value = "data2")]
    pub results_dir: PathBuf,

    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(short = 'p', long, env = "SERVER_PORT", default_value_t = 8000)]
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone, Args)]
pub struct LogConfig {
    /// Default level when `RUST_LOG` is unset.
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    #[arg(long, env = "LOG_FILE", default_value = "application.log")]
    pub log_file: PathBuf,
}

/// Everything the subcommands share.
#[derive(Debug, Clone, Args)]
pub struct OrdaConfig {
    #[command(flatten)]
    pub openai: OpenAiConfig,
    #[command(flatten)]
    pub pinecone: PineconeConfig,
    #[command(flatten)]
    pub mysql: MySqlConfig,
    #[command(flatten)]
    pub pipeline: PipelineConfig,
    #[command(flatten)]
    pub simulation: SimulationConfig,
    #[command(flatten)]
    pub paths: PathsConfig,
    #[command(flatten)]
    pub log: LogConfig,
}

fn required_secret(value: &Option<String>, name: &str) -> anyhow::Result<SecretString> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(|v| SecretString::new(v.trim().to_string()))
        .with_context(|| format!("{name} is not set"))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: OrdaConfig,
        #[command(flatten)]
        server: ServerConfig,
    }

    #[test]
    fn flags_override_defaults() {
        let cli = TestCli::try_parse_from([
            "orda",
            "--openai-api-key",
            " sk-test ",
            "--port",
            "9000",
            "--schedule-minutes",
            "5",
            "--min-investment",
            "1000",
        ])
        .unwrap();

        assert_eq!(cli.config.openai.api_key().unwrap().expose_secret(), "sk-test");
        assert_eq!(cli.server.addr().port(), 9000);
        assert_eq!(cli.config.pipeline.interval().unwrap(), Duration::from_secs(300));
        assert_eq!(cli.config.simulation.limits().unwrap().min_total, 1000.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cli = TestCli::try_parse_from([
            "orda",
            "--pinecone-api-key",
            "  ",
            "--schedule-minutes",
            "0",
            "--min-investment",
            "5",
            "--max-investment",
            "1",
        ])
        .unwrap();

        assert!(cli.config.pinecone.api_key().is_err());
        assert!(cli.config.pipeline.interval().is_err());
        assert!(cli.config.simulation.limits().is_err());
    }
}
