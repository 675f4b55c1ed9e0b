use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::AccountKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Deposit { amount: Decimal },
    Withdrawal { amount: Decimal },
    Transfer { amount: Decimal, destination: AccountKey },
    Balance,
}

/// A request against the ledger as read from the input. `date` is the
/// caller-supplied "now"; when absent the engine stamps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub account: AccountKey,
    pub date: Option<DateTime<Utc>>,
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            CommandKind::Deposit { amount } | CommandKind::Withdrawal { amount } => {
                write!(f, "{:?},account={},amount={}", self.kind, self.account, amount)
            }
            CommandKind::Transfer {
                amount,
                destination,
            } => write!(
                f,
                "Transfer,origin={},destination={},amount={}",
                self.account, destination, amount
            ),
            CommandKind::Balance => write!(f, "Balance,account={}", self.account),
        }
    }
}
