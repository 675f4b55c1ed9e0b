use std::io::Read;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use futures::stream::{self, Stream};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::traits::CommandStream;
use crate::domain::{AccountKey, AccountStatus, Command, CommandKind, Error};

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

pub struct CsvReader<R: Read> {
    reader: Option<csv::Reader<R>>,
}

impl<R: Read> CsvReader<R> {
    pub fn new(reader: R) -> Result<Self, Error> {
        Ok(Self {
            reader: Some(csv_reader(reader)),
        })
    }
}

/// Internal shape used only for CSV deserialization.
#[derive(Debug, Deserialize)]
struct CommandRow {
    #[serde(rename = "type")]
    kind: String,
    account: u32,
    sort_code: u32,
    #[serde(default)]
    amount: Option<Decimal>,
    #[serde(default)]
    destination_account: Option<u32>,
    #[serde(default)]
    destination_sort_code: Option<u32>,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

impl TryFrom<CommandRow> for Command {
    type Error = Error;

    fn try_from(row: CommandRow) -> Result<Self, Self::Error> {
        let destination = match (row.destination_account, row.destination_sort_code) {
            (Some(account_number), Some(sort_code)) => {
                Some(AccountKey::new(account_number, sort_code))
            }
            _ => None,
        };

        let kind = match (row.kind.to_ascii_lowercase().as_str(), row.amount, destination) {
            ("deposit", Some(amount), None) => CommandKind::Deposit { amount },
            ("withdrawal", Some(amount), None) => CommandKind::Withdrawal { amount },
            ("transfer", Some(amount), Some(destination)) => CommandKind::Transfer {
                amount,
                destination,
            },
            ("balance", None, None) => CommandKind::Balance,
            (other, _, _) => {
                return Err(Error::Ingestion(format!(
                    "Invalid command row: type={} account={}/{}",
                    other, row.account, row.sort_code
                )));
            }
        };

        Ok(Command {
            kind,
            account: AccountKey::new(row.account, row.sort_code),
            date: row.date,
        })
    }
}

impl<R: Read + Send + 'static> CommandStream for CsvReader<R> {
    type CmdStream = Pin<Box<dyn Stream<Item = Result<Command, Error>> + Send>>;

    fn stream(&mut self) -> Self::CmdStream {
        let Some(reader) = self.reader.take() else {
            // Already consumed.
            return Box::pin(stream::empty());
        };

        let iter = reader
            .into_deserialize::<CommandRow>()
            .map(|row_res| match row_res {
                Ok(row) => Command::try_from(row),
                Err(e) => Err(Error::Ingestion(format!(
                    "CSV deserialization error: {}",
                    e
                ))),
            });

        Box::pin(stream::iter(iter))
    }
}

#[derive(Debug, Deserialize)]
struct StatusRow {
    account: u32,
    sort_code: u32,
    closed: bool,
    frozen: bool,
}

/// Reads `account,sort_code,closed,frozen` rows. Any bad row fails the whole read.
pub fn read_account_statuses<R: Read>(reader: R) -> Result<Vec<(AccountKey, AccountStatus)>, Error> {
    csv_reader(reader)
        .into_deserialize::<StatusRow>()
        .map(|row_res| {
            let row = row_res?;
            Ok((
                AccountKey::new(row.account, row.sort_code),
                AccountStatus {
                    is_closed: row.closed,
                    is_frozen: row.frozen,
                },
            ))
        })
        .collect()
}
