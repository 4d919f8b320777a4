use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub mod injective;
pub mod sonic;

pub use injective::InjectiveExecutor;
pub use sonic::SonicExecutor;

/// Submits one transfer on a specific chain and returns its transaction
/// hash. Signing and broadcast mechanics live behind this seam.
#[async_trait]
pub trait Executor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, amount: f64, from_address: &str, to_address: &str) -> Result<String>;
}

/// Token symbol → executor lookup. Built once at startup and shared
/// read-only across all plan timers.
#[derive(Default)]
pub struct ExecutorRegistry {
    executors: HashMap<String, Arc<dyn Executor>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, symbol: &str, executor: Arc<dyn Executor>) {
        self.executors.insert(symbol.to_uppercase(), executor);
    }

    pub fn resolve(&self, symbol: &str) -> Option<Arc<dyn Executor>> {
        self.executors.get(&symbol.to_uppercase()).cloned()
    }

    pub fn supports(&self, symbol: &str) -> bool {
        self.executors.contains_key(&symbol.to_uppercase())
    }

    pub fn supported_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self.executors.keys().cloned().collect();
        tokens.sort();
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopExecutor;

    #[async_trait]
    impl Executor for NoopExecutor {
        fn name(&self) -> &'static str {
            "noop"
        }

        async fn send(&self, _amount: f64, _from: &str, _to: &str) -> Result<String> {
            Ok("0x0".to_string())
        }
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let mut registry = ExecutorRegistry::new();
        registry.register("SONIC", Arc::new(NoopExecutor));

        assert!(registry.resolve("sonic").is_some());
        assert!(registry.resolve("SONIC").is_some());
        assert!(registry.resolve("DOGE").is_none());
        assert!(!registry.supports("DOGE"));
        assert_eq!(registry.supported_tokens(), vec!["SONIC".to_string()]);
    }
}
