use std::sync::Arc;

use async_trait::async_trait;
use ethers::{
    prelude::*,
    providers::{Http, Provider},
    types::TransactionRequest as EthTxRequest,
    utils::parse_ether,
};

use crate::error::{AppError, Result};
use crate::executors::Executor;

const INJECTIVE_CHAIN_ID: u64 = 1439; // Injective EVM testnet

/// INJ transfers submitted through Injective's EVM JSON-RPC endpoint.
pub struct InjectiveExecutor {
    provider: Arc<Provider<Http>>,
    wallet: LocalWallet,
}

impl InjectiveExecutor {
    pub fn new(rpc_url: &str, private_key: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url).map_err(|e| {
            AppError::Config(format!("Failed to create Injective provider: {}", e))
        })?;

        let wallet: LocalWallet = private_key
            .trim_start_matches("0x")
            .parse()
            .map_err(|_| AppError::Config("Invalid Injective private key".to_string()))?;

        Ok(Self {
            provider: Arc::new(provider),
            wallet,
        })
    }
}

#[async_trait]
impl Executor for InjectiveExecutor {
    fn name(&self) -> &'static str {
        "injective"
    }

    async fn send(&self, amount: f64, _from_address: &str, to_address: &str) -> Result<String> {
        let to: Address = to_address
            .parse()
            .map_err(|_| AppError::ExecutorRejected(format!("Invalid address: {}", to_address)))?;

        let value: U256 = parse_ether(amount)
            .map_err(|e| AppError::ExecutorRejected(format!("Invalid amount: {}", e)))?;

        let client = SignerMiddleware::new(
            self.provider.clone(),
            self.wallet.clone().with_chain_id(INJECTIVE_CHAIN_ID),
        );

        let tx = EthTxRequest::new().to(to).value(value);

        let pending_tx = client
            .send_transaction(tx, None)
            .await
            .map_err(|e| AppError::ExecutorRejected(format!("Injective transfer failed: {}", e)))?;

        let tx_hash = format!("{:?}", pending_tx.tx_hash());
        tracing::info!(tx_hash = %tx_hash, "Injective transaction submitted");

        Ok(tx_hash)
    }
}
