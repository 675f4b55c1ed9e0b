use crate::domain::{DeadLetterQueue, Error, Outcome};

#[derive(Default, Debug)]
pub struct StdErrDLQ {}

impl DeadLetterQueue for StdErrDLQ {
    fn report(&self, error: &Error) {
        match error {
            Error::Ledger(reason) => {
                let outcome = Outcome::<()>::failure(reason);
                match serde_json::to_string(&outcome) {
                    Ok(json) => eprintln!("DLQ Report - {}", json),
                    Err(_) => eprintln!("DLQ Report - Error: {}", error),
                }
            }
            other => eprintln!("DLQ Report - Error: {}", other),
        }
    }
}
