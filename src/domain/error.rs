use crate::domain::AccountKey;

/// Business-rule rejections. `Display` gives the caller-facing reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Account is closed.")]
    AccountClosed,

    #[error("Account is currently frozen.")]
    AccountFrozen,

    #[error("Account has insufficient funds.")]
    InsufficientFunds,

    #[error("Can not deposit 0 funds.")]
    ZeroDeposit,

    #[error("Can not deposit negative funds.")]
    NegativeDeposit,

    #[error("Origin account is closed.")]
    OriginAccountClosed,

    #[error("Destination account is closed.")]
    DestinationAccountClosed,

    #[error("Origin account is currently frozen.")]
    OriginAccountFrozen,

    #[error("Destination account is currently frozen.")]
    DestinationAccountFrozen,

    #[error("Origin account has insufficient funds to complete transfer.")]
    TransferInsufficientFunds,

    #[error("Account balance is out of range.")]
    BalanceOutOfRange,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Ingestion failed with: {0}")]
    Ingestion(String),

    #[error("Engine failed with: {0}")]
    Engine(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Transactions for account {account} changed since they were read")]
    Conflict { account: AccountKey },
}
