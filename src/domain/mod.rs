pub mod account;
pub mod command;
pub mod error;
pub mod outcome;
pub mod traits;
pub mod transaction;

pub use account::{AccountKey, AccountSnapshot, AccountStatus};
pub use command::{Command, CommandKind};
pub use error::{Error, LedgerError};
pub use outcome::Outcome;
pub use traits::{BalanceReporter, Clock, CommandStream, DeadLetterQueue, ListUpdate, OutputRepository};
pub use transaction::{Transaction, TransactionList};
