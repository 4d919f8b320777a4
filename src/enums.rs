use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

// ─── Frequency ───────────────────────────────────────────────────────

/// How often a plan executes. The mapping to an interval is fixed;
/// there are no custom cron expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Minute,
    Hour,
    Day,
}

impl Frequency {
    /// Canonical string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Minute => "minute",
            Frequency::Hour => "hour",
            Frequency::Day => "day",
        }
    }

    /// Tick interval implied by the frequency.
    pub fn interval(&self) -> Duration {
        match self {
            Frequency::Minute => Duration::from_secs(60),
            Frequency::Hour => Duration::from_secs(3600),
            Frequency::Day => Duration::from_secs(86400),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minute" => Ok(Frequency::Minute),
            "hour" => Ok(Frequency::Hour),
            "day" => Ok(Frequency::Day),
            _ => Err(AppError::Validation(format!(
                "Invalid frequency: {}. Supported: minute, hour, day",
                s
            ))),
        }
    }
}

// ─── TransactionStatus ──────────────────────────────────────────────

/// Outcome of one execution attempt as recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Pending,
    Completed,
    Failed,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Completed => "completed",
            TxStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TxStatus::Pending),
            "completed" => Ok(TxStatus::Completed),
            "failed" => Ok(TxStatus::Failed),
            _ => Err(AppError::Validation(format!("Invalid tx status: {}", s))),
        }
    }
}

// ─── RiskLevel ──────────────────────────────────────────────────────

/// Volatility bucket reported by the risk analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_round_trips_through_strings() {
        for freq in [Frequency::Minute, Frequency::Hour, Frequency::Day] {
            assert_eq!(freq.as_str().parse::<Frequency>().unwrap(), freq);
        }
        assert_eq!("HOUR".parse::<Frequency>().unwrap(), Frequency::Hour);
        assert!("weekly".parse::<Frequency>().is_err());
    }

    #[test]
    fn frequency_intervals_are_fixed() {
        assert_eq!(Frequency::Minute.interval(), Duration::from_secs(60));
        assert_eq!(Frequency::Hour.interval(), Duration::from_secs(3600));
        assert_eq!(Frequency::Day.interval(), Duration::from_secs(86400));
    }
}
