//! Pure ledger operations.
//!
//! Every function takes a snapshot of the account(s) involved and returns
//! either new transaction list(s) or a [`LedgerError`]. Inputs are never
//! modified; persisting the returned lists is the caller's job.
//!
//! Balances use checked arithmetic: a total outside the `Decimal` range is
//! reported as [`LedgerError::BalanceOutOfRange`], and no operation returns a
//! list whose balance would be out of range.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{AccountSnapshot, LedgerError, TransactionList};

/// Both lists produced by a successful transfer. Apply both or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferLegs {
    pub origin_transactions: TransactionList,
    pub destination_transactions: TransactionList,
}

fn balance_of(transactions: &TransactionList) -> Result<Decimal, LedgerError> {
    transactions
        .balance()
        .ok_or(LedgerError::BalanceOutOfRange)
}

fn ensure_in_range(balance: Option<Decimal>) -> Result<(), LedgerError> {
    balance.map(|_| ()).ok_or(LedgerError::BalanceOutOfRange)
}

/// Sum of all amounts on the account. The key only gives context; the list
/// is assumed to belong to that account already.
pub fn compute_balance(account: &AccountSnapshot) -> Result<Decimal, LedgerError> {
    account.status.ensure_usable()?;
    balance_of(&account.transactions)
}

/// Records `-amount` on the account if the balance covers it.
///
/// `amount` is not checked for being positive.
pub fn withdraw(
    amount: Decimal,
    account: &AccountSnapshot,
    now: DateTime<Utc>,
) -> Result<TransactionList, LedgerError> {
    let balance = compute_balance(account)?;
    if balance < amount {
        return Err(LedgerError::InsufficientFunds);
    }
    ensure_in_range(balance.checked_sub(amount))?;

    Ok(account.transactions.prepend(account.record(-amount, now)))
}

pub fn deposit(
    amount: Decimal,
    account: &AccountSnapshot,
    now: DateTime<Utc>,
) -> Result<TransactionList, LedgerError> {
    account.status.ensure_usable()?;
    if amount.is_zero() {
        return Err(LedgerError::ZeroDeposit);
    }
    if amount.is_sign_negative() {
        return Err(LedgerError::NegativeDeposit);
    }
    ensure_in_range(balance_of(&account.transactions)?.checked_add(amount))?;

    Ok(account.transactions.prepend(account.record(amount, now)))
}

/// Moves `amount` from `origin` to `destination`.
///
/// Both legs are validated before either list is built, in this order:
/// origin closed, destination closed, origin frozen, destination frozen,
/// origin balance, then the range of both resulting balances.
/// `amount` is not checked for being positive.
pub fn transfer(
    amount: Decimal,
    origin: &AccountSnapshot,
    destination: &AccountSnapshot,
    now: DateTime<Utc>,
) -> Result<TransferLegs, LedgerError> {
    if origin.status.is_closed {
        return Err(LedgerError::OriginAccountClosed);
    }
    if destination.status.is_closed {
        return Err(LedgerError::DestinationAccountClosed);
    }
    if origin.status.is_frozen {
        return Err(LedgerError::OriginAccountFrozen);
    }
    if destination.status.is_frozen {
        return Err(LedgerError::DestinationAccountFrozen);
    }
    let origin_balance = balance_of(&origin.transactions)?;
    if origin_balance < amount {
        return Err(LedgerError::TransferInsufficientFunds);
    }
    ensure_in_range(origin_balance.checked_sub(amount))?;
    ensure_in_range(balance_of(&destination.transactions)?.checked_add(amount))?;

    Ok(TransferLegs {
        origin_transactions: origin.transactions.prepend(origin.record(-amount, now)),
        destination_transactions: destination
            .transactions
            .prepend(destination.record(amount, now)),
    })
}
