use chrono::{DateTime, Utc};
use futures::StreamExt;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{
    AccountKey, Command, CommandKind, Error, ListUpdate,
    traits::{BalanceReporter, Clock, CommandStream, DeadLetterQueue, OutputRepository},
};
use crate::ledger;

/// Drives commands through the ledger: read a snapshot, run the pure
/// operation, commit the result. Rejected commands go to the DLQ, balance
/// answers to the reporter.
#[derive(Debug)]
pub struct Engine<I, O, D, R, C>
where
    I: CommandStream,
    O: OutputRepository,
    D: DeadLetterQueue,
    R: BalanceReporter,
    C: Clock,
{
    ingestion: I,
    output_repository: O,
    dlq: D,
    reporter: R,
    clock: C,
}

impl<I, O, D, R, C> Engine<I, O, D, R, C>
where
    I: CommandStream,
    O: OutputRepository,
    D: DeadLetterQueue,
    R: BalanceReporter,
    C: Clock,
{
    pub fn new(ingestion: I, output_repository: O, dlq: D, reporter: R, clock: C) -> Self {
        Self {
            ingestion,
            output_repository,
            dlq,
            reporter,
            clock,
        }
    }

    pub async fn process(&mut self) -> Result<(), Error> {
        let mut commands = self.ingestion.stream();

        while let Some(command) = commands.next().await {
            let result = command.and_then(|command| {
                debug!(%command, "applying command");
                self.apply_command(command)
            });

            if let Err(e) = result {
                debug!(error = %e, "command rejected");
                self.dlq.report(&e);
            }
        }

        Ok(())
    }

    fn apply_command(&mut self, command: Command) -> Result<(), Error> {
        let now = command.date.unwrap_or_else(|| self.clock.now());

        match command.kind {
            CommandKind::Deposit { amount } => self.deposit(&command.account, amount, now),
            CommandKind::Withdrawal { amount } => self.withdraw(&command.account, amount, now),
            CommandKind::Transfer {
                amount,
                destination,
            } => self.transfer(&command.account, &destination, amount, now),
            CommandKind::Balance => self.balance(&command.account),
        }
    }

    fn deposit(
        &mut self,
        account: &AccountKey,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        let snapshot = self.output_repository.snapshot(account);
        let replacement = ledger::deposit(amount, &snapshot, now)?;

        self.output_repository.commit(vec![ListUpdate {
            account: *account,
            expected: snapshot.transactions,
            replacement,
        }])
    }

    fn withdraw(
        &mut self,
        account: &AccountKey,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        let snapshot = self.output_repository.snapshot(account);
        let replacement = ledger::withdraw(amount, &snapshot, now)?;

        self.output_repository.commit(vec![ListUpdate {
            account: *account,
            expected: snapshot.transactions,
            replacement,
        }])
    }

    fn transfer(
        &mut self,
        origin: &AccountKey,
        destination: &AccountKey,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        if origin == destination {
            return Err(Error::Engine(format!(
                "Transfer origin and destination are both {}",
                origin
            )));
        }

        let origin_snapshot = self.output_repository.snapshot(origin);
        let destination_snapshot = self.output_repository.snapshot(destination);
        let legs = ledger::transfer(amount, &origin_snapshot, &destination_snapshot, now)?;

        self.output_repository.commit(vec![
            ListUpdate {
                account: *origin,
                expected: origin_snapshot.transactions,
                replacement: legs.origin_transactions,
            },
            ListUpdate {
                account: *destination,
                expected: destination_snapshot.transactions,
                replacement: legs.destination_transactions,
            },
        ])
    }

    fn balance(&mut self, account: &AccountKey) -> Result<(), Error> {
        let snapshot = self.output_repository.snapshot(account);
        let balance = ledger::compute_balance(&snapshot)?;
        self.reporter.report_balance(account, balance);
        Ok(())
    }

    pub fn output_repository(&self) -> &O {
        &self.output_repository
    }

    pub fn dlq(&self) -> &D {
        &self.dlq
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.output_repository.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::domain::{AccountStatus, LedgerError};
    use crate::output_repository::StdOutOutput;
    use chrono::TimeZone;
    use futures::stream::{self, BoxStream};
    use std::sync::Mutex;

    struct VecStream(Option<Vec<Result<Command, Error>>>);

    impl CommandStream for VecStream {
        type CmdStream = BoxStream<'static, Result<Command, Error>>;

        fn stream(&mut self) -> Self::CmdStream {
            Box::pin(stream::iter(self.0.take().unwrap_or_default()))
        }
    }

    #[derive(Default)]
    struct RecordingDLQ(Mutex<Vec<String>>);

    impl DeadLetterQueue for RecordingDLQ {
        fn report(&self, error: &Error) {
            self.0.lock().unwrap().push(error.to_string());
        }
    }

    #[derive(Default)]
    struct RecordingReporter(Mutex<Vec<(AccountKey, Decimal)>>);

    impl BalanceReporter for RecordingReporter {
        fn report_balance(&self, account: &AccountKey, balance: Decimal) {
            self.0.lock().unwrap().push((*account, balance));
        }
    }

    fn clock_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
    }

    const ALICE: AccountKey = AccountKey {
        account_number: 10203040,
        sort_code: 102030,
    };
    const BOB: AccountKey = AccountKey {
        account_number: 50607080,
        sort_code: 405060,
    };

    fn command(account: AccountKey, kind: CommandKind) -> Result<Command, Error> {
        Ok(Command {
            kind,
            account,
            date: None,
        })
    }

    fn amount(value: i64) -> Decimal {
        Decimal::from(value)
    }

    type TestEngine =
        Engine<VecStream, StdOutOutput<Vec<u8>>, RecordingDLQ, RecordingReporter, FixedClock>;

    async fn run(
        commands: Vec<Result<Command, Error>>,
        statuses: Vec<(AccountKey, AccountStatus)>,
    ) -> TestEngine {
        let mut engine = Engine::new(
            VecStream(Some(commands)),
            StdOutOutput::with_writer(Vec::new()).with_statuses(statuses),
            RecordingDLQ::default(),
            RecordingReporter::default(),
            FixedClock(clock_time()),
        );
        engine.process().await.unwrap();
        engine
    }

    fn balance_of(engine: &TestEngine, account: &AccountKey) -> Decimal {
        engine
            .output_repository()
            .transactions(account)
            .and_then(|list| list.balance())
            .unwrap_or_default()
    }

    fn dead_letters(engine: &TestEngine) -> Vec<String> {
        engine.dlq().0.lock().unwrap().clone()
    }

    fn balance_answers(engine: &TestEngine) -> Vec<(AccountKey, Decimal)> {
        engine.reporter().0.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn applies_commands_in_order() {
        let engine = run(
            vec![
                command(ALICE, CommandKind::Deposit { amount: amount(200) }),
                command(ALICE, CommandKind::Withdrawal { amount: amount(50) }),
                command(
                    ALICE,
                    CommandKind::Transfer {
                        amount: amount(30),
                        destination: BOB,
                    },
                ),
                command(BOB, CommandKind::Balance),
            ],
            vec![],
        )
        .await;

        assert_eq!(balance_of(&engine, &ALICE), amount(120));
        assert_eq!(balance_of(&engine, &BOB), amount(30));
        assert!(dead_letters(&engine).is_empty());
        assert_eq!(balance_answers(&engine), vec![(BOB, amount(30))]);
    }

    #[tokio::test]
    async fn missing_date_is_stamped_by_clock() {
        let explicit = Utc.with_ymd_and_hms(2023, 12, 24, 18, 0, 0).unwrap();
        let engine = run(
            vec![
                command(ALICE, CommandKind::Deposit { amount: amount(10) }),
                Ok(Command {
                    kind: CommandKind::Deposit { amount: amount(5) },
                    account: ALICE,
                    date: Some(explicit),
                }),
            ],
            vec![],
        )
        .await;

        let dates: Vec<DateTime<Utc>> = engine
            .output_repository()
            .transactions(&ALICE)
            .unwrap()
            .iter()
            .map(|tx| tx.date)
            .collect();
        assert_eq!(dates, vec![explicit, clock_time()]);
    }

    #[tokio::test]
    async fn rejections_are_reported_and_state_is_kept() {
        let engine = run(
            vec![
                command(ALICE, CommandKind::Deposit { amount: amount(50) }),
                command(ALICE, CommandKind::Deposit { amount: amount(0) }),
                command(ALICE, CommandKind::Withdrawal { amount: amount(80) }),
                command(
                    ALICE,
                    CommandKind::Transfer {
                        amount: amount(100),
                        destination: BOB,
                    },
                ),
                Err(Error::Ingestion("bad row".to_string())),
            ],
            vec![],
        )
        .await;

        assert_eq!(balance_of(&engine, &ALICE), amount(50));
        assert_eq!(balance_of(&engine, &BOB), Decimal::ZERO);
        assert_eq!(
            dead_letters(&engine),
            vec![
                LedgerError::ZeroDeposit.to_string(),
                LedgerError::InsufficientFunds.to_string(),
                LedgerError::TransferInsufficientFunds.to_string(),
                "Ingestion failed with: bad row".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn status_flags_gate_commands() {
        let engine = run(
            vec![
                command(ALICE, CommandKind::Deposit { amount: amount(50) }),
                command(BOB, CommandKind::Deposit { amount: amount(50) }),
                command(
                    ALICE,
                    CommandKind::Transfer {
                        amount: amount(10),
                        destination: BOB,
                    },
                ),
                command(BOB, CommandKind::Balance),
            ],
            vec![(
                BOB,
                AccountStatus {
                    is_closed: false,
                    is_frozen: true,
                },
            )],
        )
        .await;

        assert_eq!(balance_of(&engine, &ALICE), amount(50));
        assert_eq!(
            dead_letters(&engine),
            vec![
                "Account is currently frozen.".to_string(),
                "Destination account is currently frozen.".to_string(),
                "Account is currently frozen.".to_string(),
            ]
        );
        assert!(balance_answers(&engine).is_empty());
    }

    #[tokio::test]
    async fn oversized_deposits_are_rejected_and_balance_still_answers() {
        let engine = run(
            vec![
                command(ALICE, CommandKind::Deposit { amount: Decimal::MAX }),
                command(ALICE, CommandKind::Deposit { amount: Decimal::MAX }),
                command(ALICE, CommandKind::Balance),
            ],
            vec![],
        )
        .await;

        assert_eq!(
            dead_letters(&engine),
            vec![LedgerError::BalanceOutOfRange.to_string()]
        );
        assert_eq!(balance_answers(&engine), vec![(ALICE, Decimal::MAX)]);
    }

    #[tokio::test]
    async fn self_transfer_is_rejected() {
        let engine = run(
            vec![
                command(ALICE, CommandKind::Deposit { amount: amount(50) }),
                command(
                    ALICE,
                    CommandKind::Transfer {
                        amount: amount(10),
                        destination: ALICE,
                    },
                ),
            ],
            vec![],
        )
        .await;

        assert_eq!(balance_of(&engine, &ALICE), amount(50));
        assert_eq!(dead_letters(&engine).len(), 1);
    }
}
