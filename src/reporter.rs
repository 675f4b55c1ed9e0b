use rust_decimal::Decimal;

use crate::domain::{AccountKey, BalanceReporter, Outcome};

/// Prints each balance answer as an `Outcome` JSON line on stderr,
/// next to the DLQ's failure lines.
#[derive(Default, Debug)]
pub struct StdErrReporter {}

impl BalanceReporter for StdErrReporter {
    fn report_balance(&self, account: &AccountKey, balance: Decimal) {
        match serde_json::to_string(&Outcome::success(balance)) {
            Ok(json) => eprintln!("Balance Report - {} {}", account, json),
            Err(_) => eprintln!("Balance Report - {} {}", account, balance),
        }
    }
}
