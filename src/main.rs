//! Upload encrypted secrets to a Decentralized Oracle Network.
//!
//! ```text
//!  env (PRIVATE_KEY, SEPOLIA_RPC_URL, ALPACA_*)     config (--config TOML)
//!        │                                               │
//!        ▼                                               ▼
//!  ┌──────────────────────────────────────────────────────────────┐
//!  │ SecretsUploader                                              │
//!  │   credentials → wallet + RPC provider → DonSecretsManager    │
//!  │   initialize (router → coordinator → DON keys)               │
//!  │   encrypt_secrets → upload_encrypted_secrets_to_don          │
//!  └──────────────────────────────────────────────────────────────┘
//!        │                                   │
//!        ▼                                   ▼
//!   stdout: "Secrets version: N"        exit status 0 / 1
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use functions_secrets::config::{self, EnvVars};
use functions_secrets::functions::DonSecretsManager;
use functions_secrets::observability::logging::{self, LogFormat};
use functions_secrets::{SecretsUploader, UploaderResult};

#[derive(Parser)]
#[command(name = "functions-secrets")]
#[command(about = "Encrypt secrets and upload them to DON gateways", long_about = None)]
struct Cli {
    /// TOML file overriding the router, DON id and gateway URLs.
    #[arg(short, long, env = "SECRETS_UPLOADER_CONFIG")]
    config: Option<PathBuf>,

    /// Log line format (logs go to stderr).
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

async fn upload(cli: &Cli) -> UploaderResult<u64> {
    let config = config::load_or_default(cli.config.as_deref())
        .map_err(config::ConfigurationError::from)?;

    tracing::info!(
        router = %config.functions.router_address,
        don_id = %config.functions.don_id,
        gateways = config.functions.gateway_urls.len(),
        "Configuration loaded"
    );

    let uploader = SecretsUploader::new(config, EnvVars::from_process());
    let mut stdout = std::io::stdout().lock();
    uploader.run(DonSecretsManager::connect, &mut stdout).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    match upload(&cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Upload failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
