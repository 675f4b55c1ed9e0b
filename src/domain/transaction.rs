use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// A single ledger record. The sign of `amount` encodes direction:
/// negative for money leaving the account, positive for money arriving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub account_number: u32,
    pub sort_code: u32,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

impl core::fmt::Display for Transaction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "account={},sort_code={},amount={},date={}",
            self.account_number,
            self.sort_code,
            self.amount,
            self.date.to_rfc3339()
        )
    }
}

struct Node {
    transaction: Transaction,
    next: Option<Arc<Node>>,
}

/// Immutable transaction history of one account, newest record first.
///
/// Prepending shares every existing node with the original list, so older
/// snapshots stay valid and unchanged for as long as anyone holds them.
#[derive(Clone, Default)]
pub struct TransactionList {
    head: Option<Arc<Node>>,
    len: usize,
}

impl TransactionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new list with `transaction` in front. `self` is untouched.
    pub fn prepend(&self, transaction: Transaction) -> Self {
        Self {
            head: Some(Arc::new(Node {
                transaction,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// The most recently recorded transaction, regardless of its date.
    pub fn latest(&self) -> Option<&Transaction> {
        self.head.as_deref().map(|node| &node.transaction)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Sum of all amounts, or `None` if the total is out of `Decimal` range.
    pub fn balance(&self) -> Option<Decimal> {
        self.iter()
            .try_fold(Decimal::ZERO, |acc, tx| acc.checked_add(tx.amount))
    }

    /// True when both handles point at the very same snapshot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Drop for TransactionList {
    // Unlink iteratively so long histories do not overflow the stack.
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Transaction;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.transaction
        })
    }
}

impl<'a> IntoIterator for &'a TransactionList {
    type Item = &'a Transaction;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builds a list that iterates in the same order as the input.
impl FromIterator<Transaction> for TransactionList {
    fn from_iter<T: IntoIterator<Item = Transaction>>(iter: T) -> Self {
        let mut items: Vec<Transaction> = iter.into_iter().collect();
        let mut list = Self::new();
        while let Some(tx) = items.pop() {
            list = list.prepend(tx);
        }
        list
    }
}

impl PartialEq for TransactionList {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for TransactionList {}

impl core::fmt::Debug for TransactionList {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Serialize for TransactionList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}
