//! Personal-banking ledger.
//!
//! [`ledger`] holds the pure operations (balance, withdraw, deposit,
//! transfer) over immutable [`domain::TransactionList`] snapshots. The
//! remaining modules are a streaming caller around them: CSV ingestion,
//! an in-memory compare-and-swap account store, a dead-letter queue for
//! rejections and a reporter for balance answers.

pub mod clock;
pub mod dlq;
pub mod domain;
pub mod engine;
pub mod ingestion;
pub mod ledger;
pub mod logging;
pub mod output_repository;
pub mod reporter;

pub use domain::{
    AccountKey, AccountSnapshot, AccountStatus, Error, LedgerError, Outcome, Transaction,
    TransactionList,
};
pub use ledger::{TransferLegs, compute_balance, deposit, transfer, withdraw};
