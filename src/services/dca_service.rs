use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::db::entity::{plan, transaction};
use crate::enums::{Frequency, TxStatus};
use crate::error::{AppError, Result};
use crate::executors::ExecutorRegistry;
use crate::services::price_service::PriceOracle;
use crate::store::{LedgerStore, NewPlan, NewTransaction};

/// Sentinel hash recorded on failed attempts.
const FAILED_TX_HASH: &str = "failed";

/// Plan parameters as submitted by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub token_symbol: String,
    pub amount: f64,
    pub frequency: String,
    pub to_address: String,
}

/// Bookkeeping for one armed plan timer.
///
/// `gate` is true while the plan may execute. The timer task holds it for
/// the whole of each execution, so ticks of one plan never overlap, and
/// stopping flips it under the same lock, so once `stop_plan` returns no
/// new execution can begin.
struct PlanJob {
    cancel: watch::Sender<bool>,
    gate: Arc<Mutex<bool>>,
}

struct Inner {
    ledger: Arc<dyn LedgerStore>,
    oracle: Arc<dyn PriceOracle>,
    registry: Arc<ExecutorRegistry>,
    jobs: RwLock<HashMap<Uuid, PlanJob>>,
    platform_address: String,
    send_timeout: Duration,
}

/// The plan scheduler: one timer task per active plan, each running the
/// execution protocol on every tick. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct DcaService {
    inner: Arc<Inner>,
}

struct Fill {
    price: f64,
    token_amount: f64,
    tx_hash: String,
}

impl DcaService {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        oracle: Arc<dyn PriceOracle>,
        registry: Arc<ExecutorRegistry>,
        platform_address: String,
        send_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                ledger,
                oracle,
                registry,
                jobs: RwLock::new(HashMap::new()),
                platform_address,
                send_timeout,
            }),
        }
    }

    /// Re-arm timers for every plan that was active before the process
    /// went down. Missed ticks are not backfilled; each plan's next tick
    /// fires one full interval from now.
    pub async fn bootstrap(&self) -> Result<()> {
        let plans = self.inner.ledger.list_active_plans().await?;
        let count = plans.len();

        for plan in &plans {
            self.arm(plan).await;
        }

        tracing::info!(count, "Initialized active plans");
        Ok(())
    }

    /// Validate, persist, and arm a new plan. Unsupported tokens are a
    /// creation-time error so they can never surface mid-execution.
    pub async fn create_plan(&self, user_id: Uuid, request: PlanRequest) -> Result<plan::Model> {
        let frequency: Frequency = request.frequency.parse()?;

        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(AppError::Validation("Amount must be positive".to_string()));
        }

        let token_symbol = request.token_symbol.trim().to_uppercase();
        if !self.inner.registry.supports(&token_symbol) {
            return Err(AppError::Validation(format!(
                "Unsupported token: {}. Supported: {}",
                token_symbol,
                self.inner.registry.supported_tokens().join(", ")
            )));
        }

        if request.to_address.trim().is_empty() {
            return Err(AppError::Validation(
                "Destination address is required".to_string(),
            ));
        }

        self.inner
            .ledger
            .create_user_if_absent(user_id, &self.inner.platform_address)
            .await?;

        let plan = self
            .inner
            .ledger
            .create_plan(NewPlan {
                user_id,
                token_symbol,
                amount: request.amount,
                frequency,
                to_address: request.to_address,
            })
            .await?;

        self.arm(&plan).await;

        tracing::info!(plan_id = %plan.id, frequency = %plan.frequency, "Scheduled plan");
        Ok(plan)
    }

    /// Deactivate a plan and tear down its timer. Idempotent: stopping an
    /// already-inactive plan is a no-op success. An execution in flight at
    /// the moment of the call completes and records its outcome.
    pub async fn stop_plan(&self, plan_id: Uuid) -> Result<plan::Model> {
        let mut plan = self
            .inner
            .ledger
            .get_plan(plan_id)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        if plan.is_active {
            plan.is_active = false;
            plan = self.inner.ledger.update_plan(plan).await?;
        }

        self.disarm(plan_id).await;

        tracing::info!(plan_id = %plan_id, "Stopped plan");
        Ok(plan)
    }

    pub async fn list_plans(&self, user_id: Uuid) -> Result<Vec<plan::Model>> {
        self.inner.ledger.list_plans_by_user(user_id).await
    }

    /// Ledger entries for a plan, newest first.
    pub async fn plan_transactions(&self, plan_id: Uuid) -> Result<Vec<transaction::Model>> {
        self.inner.ledger.list_transactions_by_plan(plan_id).await
    }

    pub async fn total_investment(&self, user_id: Uuid) -> Result<f64> {
        self.inner.ledger.sum_total_invested_by_user(user_id).await
    }

    /// Whether a live timer exists for the plan.
    pub async fn is_armed(&self, plan_id: Uuid) -> bool {
        self.inner.jobs.read().await.contains_key(&plan_id)
    }

    /// Rebuild `plan.total_invested` and `user.total_invested` from the
    /// completed rows of the transaction ledger, which is authoritative.
    /// Intended for recovery after a crash between the ledger append and
    /// the aggregate updates.
    pub async fn reconcile(&self, user_id: Uuid) -> Result<()> {
        let plans = self.inner.ledger.list_plans_by_user(user_id).await?;
        let mut user_total = 0.0;

        for plan in plans {
            let txs = self.inner.ledger.list_transactions_by_plan(plan.id).await?;
            let completed: f64 = txs
                .iter()
                .filter(|t| t.status == TxStatus::Completed.as_str())
                .map(|t| t.amount)
                .sum();

            user_total += completed;

            if (completed - plan.total_invested).abs() > f64::EPSILON {
                tracing::warn!(
                    plan_id = %plan.id,
                    cached = plan.total_invested,
                    ledger = completed,
                    "Aggregate drift detected; rebuilding from ledger"
                );
                let mut updated = plan.clone();
                updated.total_invested = completed;
                self.inner.ledger.update_plan(updated).await?;
            }
        }

        self.inner.ledger.set_user_invested(user_id, user_total).await?;
        Ok(())
    }

    /// Spawn the periodic timer task for one plan. The first tick fires
    /// one full interval after arming.
    async fn arm(&self, plan: &plan::Model) {
        let frequency = match plan.frequency.parse::<Frequency>() {
            Ok(frequency) => frequency,
            Err(e) => {
                tracing::error!(plan_id = %plan.id, error = %e, "Cannot arm plan");
                return;
            }
        };

        let period = frequency.interval();
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let gate = Arc::new(Mutex::new(true));

        let service = self.clone();
        let task_gate = gate.clone();
        let plan_id = plan.id;

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel_rx.changed() => break,
                    _ = ticker.tick() => {
                        let live = task_gate.lock().await;
                        if !*live {
                            break;
                        }
                        service.run_execution(plan_id).await;
                    }
                }
            }
        });

        self.inner
            .jobs
            .write()
            .await
            .insert(plan_id, PlanJob { cancel: cancel_tx, gate });

        // A stop racing this arm can run before the insert above and find
        // no timer to tear down. Re-check the plan and release here.
        match self.inner.ledger.get_plan(plan_id).await {
            Ok(Some(current)) if current.is_active => {}
            Ok(_) => self.disarm(plan_id).await,
            Err(e) => {
                tracing::error!(plan_id = %plan_id, error = %e, "Failed to confirm plan after arming");
            }
        }
    }

    async fn disarm(&self, plan_id: Uuid) {
        let job = self.inner.jobs.write().await.remove(&plan_id);

        if let Some(job) = job {
            let mut live = job.gate.lock().await;
            *live = false;
            drop(live);

            let _ = job.cancel.send(true);
        }
    }

    /// One tick of one plan. Failures are recorded in the ledger and
    /// swallowed; nothing waits on a timer firing.
    async fn run_execution(&self, plan_id: Uuid) {
        let plan = match self.inner.ledger.get_plan(plan_id).await {
            Ok(Some(plan)) if plan.is_active => plan,
            Ok(_) => return, // stopped or removed between ticks
            Err(e) => {
                tracing::error!(plan_id = %plan_id, error = %e, "Failed to load plan for execution");
                return;
            }
        };

        tracing::info!(plan_id = %plan.id, token = %plan.token_symbol, "Executing DCA plan");

        match self.attempt(&plan).await {
            Ok(fill) => {
                if let Err(e) = self.record_success(&plan, &fill).await {
                    tracing::error!(plan_id = %plan.id, error = %e, "Failed to record execution");
                }
            }
            Err(e) => {
                tracing::error!(plan_id = %plan.id, error = %e, "Failed to execute DCA plan");
                self.record_failure(&plan).await;
            }
        }
    }

    async fn attempt(&self, plan: &plan::Model) -> Result<Fill> {
        if self.inner.ledger.get_user(plan.user_id).await?.is_none() {
            return Err(AppError::Internal(format!(
                "User {} not found for plan {}",
                plan.user_id, plan.id
            )));
        }

        let executor = self
            .inner
            .registry
            .resolve(&plan.token_symbol)
            .ok_or_else(|| {
                AppError::Internal(format!("Unsupported token: {}", plan.token_symbol))
            })?;

        let price = self.inner.oracle.current_price(&plan.token_symbol).await?;
        if price <= 0.0 {
            return Err(AppError::Upstream(format!(
                "Oracle returned non-positive price for {}: {}",
                plan.token_symbol, price
            )));
        }

        let send = executor.send(plan.amount, &self.inner.platform_address, &plan.to_address);
        let tx_hash = match timeout(self.inner.send_timeout, send).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(AppError::Upstream(format!(
                    "{} send timed out after {:?}",
                    executor.name(),
                    self.inner.send_timeout
                )));
            }
        };

        Ok(Fill {
            price,
            token_amount: plan.amount / price,
            tx_hash,
        })
    }

    /// The ledger append happens before the aggregate updates, so a crash
    /// between writes leaves the ledger ahead of the caches, never behind.
    async fn record_success(&self, plan: &plan::Model, fill: &Fill) -> Result<()> {
        self.inner
            .ledger
            .append_transaction(NewTransaction {
                plan_id: Some(plan.id),
                user_id: plan.user_id,
                token_symbol: plan.token_symbol.clone(),
                amount: plan.amount,
                token_amount: fill.token_amount,
                token_price: fill.price,
                tx_hash: fill.tx_hash.clone(),
                status: TxStatus::Completed,
            })
            .await?;

        // Reload rather than write back the copy from tick start, so a
        // stop that landed mid-execution keeps the plan inactive.
        if let Some(mut current) = self.inner.ledger.get_plan(plan.id).await? {
            current.last_execution_time = Some(Utc::now());
            current.total_invested += plan.amount;
            self.inner.ledger.update_plan(current).await?;
        }

        self.inner
            .ledger
            .increment_user_invested(plan.user_id, plan.amount)
            .await?;

        tracing::info!(
            plan_id = %plan.id,
            tx_hash = %fill.tx_hash,
            "Successfully executed DCA plan"
        );
        Ok(())
    }

    async fn record_failure(&self, plan: &plan::Model) {
        let result = self
            .inner
            .ledger
            .append_transaction(NewTransaction {
                plan_id: Some(plan.id),
                user_id: plan.user_id,
                token_symbol: plan.token_symbol.clone(),
                amount: plan.amount,
                token_amount: 0.0,
                token_price: 0.0,
                tx_hash: FAILED_TX_HASH.to_string(),
                status: TxStatus::Failed,
            })
            .await;

        if let Err(e) = result {
            tracing::error!(plan_id = %plan.id, error = %e, "Failed to record failed transaction");
        }
    }
}
