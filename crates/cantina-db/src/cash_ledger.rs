//! # Cash Ledger
//!
//! A file-backed running cash balance, independent of the relational
//! store.
//!
//! Once per elapsed day the balance absorbs that day's net
//! (revenue − expenses). State is a small JSON file holding the balance
//! and the last day already folded in, so repeated rolls within the same
//! day are no-ops and a store that sat closed over a weekend catches up
//! day by day on the next open.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::DbError;
use crate::repository::report::{day_bounds, ReportRepository};

/// Errors from reading or updating the cash ledger file.
#[derive(Debug, Error)]
pub enum CashLedgerError {
    /// Ledger file could not be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Ledger file is not valid JSON state.
    #[error("malformed ledger state: {0}")]
    Serde(#[from] serde_json::Error),

    /// Reporting query failed while computing a day's net.
    #[error(transparent)]
    Storage(#[from] DbError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerState {
    balance_cents: i64,
    /// Most recent day whose net is already in the balance.
    last_rolled: NaiveDate,
}

/// The persisted cash balance and its roll-forward logic.
#[derive(Debug, Clone)]
pub struct CashLedger {
    path: PathBuf,
}

impl CashLedger {
    /// Creates a ledger backed by the JSON file at `path`. The file is
    /// created on the first roll.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CashLedger { path: path.into() }
    }

    /// Current balance in cents; 0 when the ledger has never rolled.
    pub fn balance(&self) -> Result<i64, CashLedgerError> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                let state: LedgerState = serde_json::from_slice(&bytes)?;
                Ok(state.balance_cents)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(err) => Err(err.into()),
        }
    }

    /// Folds every completed day since the last roll into the balance:
    /// for each day in `(last_rolled, today)` the day's
    /// (revenue − expenses) is added. `today` itself is never rolled,
    /// its sales are still accumulating. Idempotent within a day.
    ///
    /// Returns the balance after rolling.
    pub async fn roll_forward(
        &self,
        reports: &ReportRepository,
        today: NaiveDate,
    ) -> Result<i64, CashLedgerError> {
        let mut state = self.load(today)?;

        let mut day = match state.last_rolled.succ_opt() {
            Some(d) => d,
            None => return Ok(state.balance_cents),
        };

        while day < today {
            let (start, end) = day_bounds(day);
            let flow = reports.cash_flow(start, end).await?;
            state.balance_cents += flow.net_cents;
            state.last_rolled = day;

            debug!(%day, net_cents = flow.net_cents, "rolled day into cash ledger");

            day = match day.succ_opt() {
                Some(d) => d,
                None => break,
            };
        }

        self.save(&state)?;

        info!(
            balance_cents = state.balance_cents,
            last_rolled = %state.last_rolled,
            "cash ledger up to date"
        );

        Ok(state.balance_cents)
    }

    fn load(&self, today: NaiveDate) -> Result<LedgerState, CashLedgerError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                // Fresh ledger: nothing before today counts.
                Ok(LedgerState {
                    balance_cents: 0,
                    last_rolled: today.pred_opt().unwrap_or(today),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, state: &LedgerState) -> Result<(), CashLedgerError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
