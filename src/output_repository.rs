use std::collections::BTreeMap;
use std::io::Write;

use crate::domain::{
    AccountKey, AccountSnapshot, AccountStatus, Error, LedgerError, ListUpdate,
    OutputRepository, TransactionList,
};

#[derive(Debug, Default, Clone)]
struct AccountRecord {
    status: AccountStatus,
    transactions: TransactionList,
}

/// In-memory account store that prints a balance report on flush.
#[derive(Debug)]
pub struct StdOutOutput<W: Write = std::io::Stdout> {
    accounts: BTreeMap<AccountKey, AccountRecord>,
    out: W,
}

impl StdOutOutput {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl Default for StdOutOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdOutOutput<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            accounts: BTreeMap::new(),
            out,
        }
    }

    /// Seeds status flags for known accounts.
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = (AccountKey, AccountStatus)>) -> Self {
        for (key, status) in statuses {
            self.accounts.entry(key).or_default().status = status;
        }
        self
    }

    pub fn transactions(&self, account: &AccountKey) -> Option<&TransactionList> {
        self.accounts.get(account).map(|record| &record.transactions)
    }

    pub fn into_writer(self) -> W {
        self.out
    }
}

impl<W: Write> OutputRepository for StdOutOutput<W> {
    fn snapshot(&mut self, account: &AccountKey) -> AccountSnapshot {
        let record = self.accounts.entry(*account).or_default();
        AccountSnapshot::new(*account, record.transactions.clone(), record.status)
    }

    fn commit(&mut self, updates: Vec<ListUpdate>) -> Result<(), Error> {
        for update in &updates {
            let current = self
                .accounts
                .get(&update.account)
                .map(|record| &record.transactions);
            let unchanged = match current {
                Some(current) => current.ptr_eq(&update.expected),
                None => update.expected.is_empty(),
            };
            if !unchanged {
                return Err(Error::Conflict {
                    account: update.account,
                });
            }
        }

        for update in updates {
            self.accounts.entry(update.account).or_default().transactions = update.replacement;
        }

        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        let mut writer = csv::Writer::from_writer(&mut self.out);
        writer.write_record(["account", "sort_code", "balance", "closed", "frozen"])?;
        for (key, record) in &self.accounts {
            let balance = record
                .transactions
                .balance()
                .ok_or(LedgerError::BalanceOutOfRange)?;
            writer.write_record([
                key.account_number.to_string(),
                key.sort_code.to_string(),
                balance.normalize().to_string(),
                record.status.is_closed.to_string(),
                record.status.is_frozen.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}
