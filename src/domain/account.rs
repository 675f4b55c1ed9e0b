use serde::{Deserialize, Serialize};

use crate::domain::{LedgerError, Transaction, TransactionList};

/// Identifies an account by account number and sort code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountKey {
    pub account_number: u32,
    pub sort_code: u32,
}

impl AccountKey {
    pub fn new(account_number: u32, sort_code: u32) -> Self {
        Self {
            account_number,
            sort_code,
        }
    }
}

impl core::fmt::Display for AccountKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.account_number, self.sort_code)
    }
}

/// Status flags owned by the caller. The ledger only reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatus {
    pub is_closed: bool,
    pub is_frozen: bool,
}

impl AccountStatus {
    pub fn open() -> Self {
        Self::default()
    }

    /// Closed is checked before frozen.
    pub fn ensure_usable(&self) -> Result<(), LedgerError> {
        if self.is_closed {
            return Err(LedgerError::AccountClosed);
        }
        if self.is_frozen {
            return Err(LedgerError::AccountFrozen);
        }
        Ok(())
    }
}

/// Everything an operation knows about one account at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub key: AccountKey,
    pub transactions: TransactionList,
    pub status: AccountStatus,
}

impl AccountSnapshot {
    pub fn new(key: AccountKey, transactions: TransactionList, status: AccountStatus) -> Self {
        Self {
            key,
            transactions,
            status,
        }
    }

    /// Builds a new record for this account.
    pub(crate) fn record(
        &self,
        amount: rust_decimal::Decimal,
        date: chrono::DateTime<chrono::Utc>,
    ) -> Transaction {
        Transaction {
            account_number: self.key.account_number,
            sort_code: self.key.sort_code,
            amount,
            date,
        }
    }
}
