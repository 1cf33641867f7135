/*!
 * s3-download CLI - Command Line Interface
 */

use clap::{Parser, ValueEnum};
use s3_download::{
    config::{DownloadConfig, LogLevel},
    core::Downloader,
    error::{DownloadError, Result},
    logging,
    protocol::s3::S3Client,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "s3-download")]
#[command(version, about = "Download objects or whole prefixes from S3 to the local filesystem", long_about = None)]
struct Cli {
    /// Bucket to download from
    #[arg(short = 'b', long)]
    bucket: Option<String>,

    /// Key or prefix to download (can be specified multiple times)
    #[arg(short = 'k', long = "key", value_name = "KEY")]
    keys: Vec<String>,

    /// Local file (single object) or directory (prefixes)
    #[arg(short = 'd', long = "download-path", value_name = "PATH")]
    download_path: Option<String>,

    /// AWS region
    #[arg(long)]
    region: Option<String>,

    /// Custom endpoint URL for S3-compatible services
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Use path-style addressing
    #[arg(long)]
    path_style: bool,

    /// Remove the requested prefix from local file names
    #[arg(long)]
    strip_prefix: bool,

    /// AWS profile name
    #[arg(long)]
    profile: Option<String>,

    /// AWS access key ID
    #[arg(long, env = "S3_DOWNLOAD_ACCESS_KEY", hide_env_values = true)]
    access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "S3_DOWNLOAD_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Maximum keys per listing page
    #[arg(long, value_name = "N")]
    page_size: Option<i32>,

    /// Check bucket access before downloading
    #[arg(long)]
    verify_connection: bool,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum)]
    log_level: Option<LogLevelArg>,

    /// Write JSON logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

impl Cli {
    /// Apply command-line values over the file configuration
    fn merge_into(self, mut config: DownloadConfig) -> DownloadConfig {
        if let Some(bucket) = self.bucket {
            config.bucket = bucket;
        }
        if !self.keys.is_empty() {
            config.keys = self.keys;
        }
        if let Some(download_path) = self.download_path {
            config.download_path = download_path;
        }
        if self.region.is_some() {
            config.region = self.region;
        }
        if self.endpoint.is_some() {
            config.endpoint = self.endpoint;
        }
        if self.path_style {
            config.path_style = Some(true);
        }
        config.strip_prefix |= self.strip_prefix;
        if self.profile.is_some() {
            config.profile = self.profile;
        }
        if self.access_key.is_some() {
            config.access_key = self.access_key;
        }
        if self.secret_key.is_some() {
            config.secret_key = self.secret_key;
        }
        if self.page_size.is_some() {
            config.page_size = self.page_size;
        }
        config.verify_connection |= self.verify_connection;
        if let Some(level) = self.log_level {
            config.log_level = level.into();
        }
        if self.log_file.is_some() {
            config.log_file = self.log_file;
        }
        config.verbose |= self.verbose;
        config
    }
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let mut cli = Cli::parse();

    let base_config = match cli.config.take() {
        Some(path) => DownloadConfig::from_file(&path)?,
        None => DownloadConfig::default(),
    };
    let config = cli.merge_into(base_config);

    if let Err(e) = logging::init_logging(&config) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let request = config.download_request()?;
    let options = config.connect_options()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let report = runtime.block_on(async {
        let client = S3Client::connect(options)
            .await
            .map_err(DownloadError::Authentication)?;
        let location = client.config().location();
        info!(
            region = location.signing_region(),
            endpoint = location.endpoint().unwrap_or("default"),
            "Connected"
        );
        Ok::<_, DownloadError>(Downloader::new(&client, &request).run().await)
    })?;

    println!("{}", report);
    for failure in &report.failures {
        eprintln!(
            "  failed: {} -> {} ({})",
            failure.key,
            failure.destination.display(),
            failure.error
        );
    }

    Ok(report.exit_code())
}
