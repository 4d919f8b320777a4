use std::env;

use uuid::Uuid;

/// Runtime configuration resolved from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// The single user context the HTTP API operates under.
    pub default_user_id: Uuid,
    /// Source address funds are sent from on every execution.
    pub platform_wallet_address: String,
    /// Hex-encoded signing key shared by the chain executors.
    pub platform_private_key: String,
    pub sonic_rpc_url: String,
    pub injective_rpc_url: String,
    /// Upper bound on a single executor send, in seconds.
    pub send_timeout_secs: u64,
    pub price_api_base: String,
    /// Recompute plan/user aggregates from the ledger at startup.
    pub reconcile_on_start: bool,
}

const DEFAULT_SONIC_RPC_URL: &str = "https://rpc.blaze.soniclabs.com";
const DEFAULT_INJECTIVE_RPC_URL: &str = "https://k8s.testnet.json-rpc.injective.network";
const DEFAULT_PRICE_API_BASE: &str = "https://api.coingecko.com/api/v3";

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let default_user_id = match env::var("DEFAULT_USER_ID") {
            Ok(raw) => raw
                .parse::<Uuid>()
                .map_err(|_| "DEFAULT_USER_ID must be a valid UUID")?,
            Err(_) => Uuid::nil(),
        };

        let platform_wallet_address = env::var("PLATFORM_WALLET_ADDRESS")?;
        let platform_private_key = env::var("PLATFORM_PRIVATE_KEY")?;

        let sonic_rpc_url = env::var("SONIC_RPC_URL")
            .unwrap_or_else(|_| DEFAULT_SONIC_RPC_URL.to_string());
        let injective_rpc_url = env::var("INJECTIVE_RPC_URL")
            .unwrap_or_else(|_| DEFAULT_INJECTIVE_RPC_URL.to_string());

        let send_timeout_secs = env::var("SEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()?;

        let price_api_base = env::var("PRICE_API_BASE")
            .unwrap_or_else(|_| DEFAULT_PRICE_API_BASE.to_string());

        let reconcile_on_start = env::var("RECONCILE_ON_START")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Config {
            database_url,
            server_host,
            server_port,
            default_user_id,
            platform_wallet_address,
            platform_private_key,
            sonic_rpc_url,
            injective_rpc_url,
            send_timeout_secs,
            price_api_base,
            reconcile_on_start,
        })
    }
}
