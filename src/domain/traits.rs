use chrono::{DateTime, Utc};
use futures::Stream;
use rust_decimal::Decimal;

use crate::domain::{AccountKey, AccountSnapshot, Command, Error, TransactionList};

pub trait CommandStream {
    type CmdStream: Stream<Item = Result<Command, Error>> + Send + Unpin + 'static;
    fn stream(&mut self) -> Self::CmdStream;
}

pub trait DeadLetterQueue {
    fn report(&self, error: &Error);
}

/// Receives the answers to successful balance queries.
pub trait BalanceReporter {
    fn report_balance(&self, account: &AccountKey, balance: Decimal);
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Replace `expected` with `replacement` for `account`.
#[derive(Debug, Clone)]
pub struct ListUpdate {
    pub account: AccountKey,
    pub expected: TransactionList,
    pub replacement: TransactionList,
}

pub trait OutputRepository {
    /// Current state of `account`. Unknown accounts start empty and open.
    fn snapshot(&mut self, account: &AccountKey) -> AccountSnapshot;

    /// Applies all updates or none of them. Fails with `Error::Conflict` if any
    /// stored list is no longer the `expected` one.
    fn commit(&mut self, updates: Vec<ListUpdate>) -> Result<(), Error>;

    fn flush(&mut self) -> Result<(), Error>;
}
