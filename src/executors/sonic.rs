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

const SONIC_CHAIN_ID: u64 = 57054; // Blaze testnet

/// Native-token transfers on the Sonic network.
pub struct SonicExecutor {
    provider: Arc<Provider<Http>>,
    wallet: LocalWallet,
}

impl SonicExecutor {
    pub fn new(rpc_url: &str, private_key: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| AppError::Config(format!("Failed to create Sonic provider: {}", e)))?;

        let wallet: LocalWallet = private_key
            .trim_start_matches("0x")
            .parse()
            .map_err(|_| AppError::Config("Invalid Sonic private key".to_string()))?;

        Ok(Self {
            provider: Arc::new(provider),
            wallet,
        })
    }
}

#[async_trait]
impl Executor for SonicExecutor {
    fn name(&self) -> &'static str {
        "sonic"
    }

    async fn send(&self, amount: f64, _from_address: &str, to_address: &str) -> Result<String> {
        let to: Address = to_address
            .parse()
            .map_err(|_| AppError::ExecutorRejected(format!("Invalid address: {}", to_address)))?;

        // Amounts are denominated 1:1 in native units at this boundary;
        // the fiat conversion recorded in the ledger happens upstream.
        let value: U256 = parse_ether(amount)
            .map_err(|e| AppError::ExecutorRejected(format!("Invalid amount: {}", e)))?;

        let client = SignerMiddleware::new(
            self.provider.clone(),
            self.wallet.clone().with_chain_id(SONIC_CHAIN_ID),
        );

        let tx = EthTxRequest::new().to(to).value(value);

        let pending_tx = client
            .send_transaction(tx, None)
            .await
            .map_err(|e| AppError::ExecutorRejected(format!("Sonic transfer failed: {}", e)))?;

        let tx_hash = format!("{:?}", pending_tx.tx_hash());
        tracing::info!(tx_hash = %tx_hash, "Sonic transaction submitted");

        Ok(tx_hash)
    }
}
