use crate::errors::TrackerError;
use crate::models::{Transaction, TransactionId, TransactionKind};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Point ledger: the transaction log plus the running balance.
///
/// The balance is carried alongside the log rather than derived from it,
/// because the daily reset prunes old credits from the log without giving
/// their points back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ledger {
    balance: i64,
    transactions: Vec<Transaction>,
    next_id: TransactionId,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from persisted parts. The id sequence resumes past
    /// the largest id present.
    pub fn from_parts(balance: i64, transactions: Vec<Transaction>) -> Self {
        let next_id = transactions.iter().map(|tx| tx.id).max().map_or(1, |id| id.saturating_add(1));
        Self {
            balance,
            transactions,
            next_id,
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn record_credit(&mut self, amount: u32, description: impl Into<String>) -> Transaction {
        self.record_credit_at(amount, description, Utc::now())
    }

    pub fn record_credit_at(
        &mut self,
        amount: u32,
        description: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Transaction {
        self.append(TransactionKind::Credit, amount, description.into(), at)
    }

    pub fn record_debit(
        &mut self,
        amount: u32,
        description: impl Into<String>,
    ) -> Result<Transaction, TrackerError> {
        self.record_debit_at(amount, description, Utc::now())
    }

    pub fn record_debit_at(
        &mut self,
        amount: u32,
        description: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<Transaction, TrackerError> {
        if self.balance < i64::from(amount) {
            return Err(TrackerError::InsufficientBalance {
                required: amount,
                available: self.balance,
            });
        }
        Ok(self.append(TransactionKind::Debit, amount, description.into(), at))
    }

    /// Removes any transaction, not only the latest, and reverses its effect
    /// on the balance.
    pub fn undo(&mut self, id: TransactionId) -> Result<Transaction, TrackerError> {
        let index = self
            .transactions
            .iter()
            .position(|tx| tx.id == id)
            .ok_or_else(|| TrackerError::not_found("transaction", id))?;
        let tx = self.transactions.remove(index);
        self.balance = self.balance.saturating_sub(tx.signed_amount());
        debug!(id, balance = self.balance, "transaction undone");
        Ok(tx)
    }

    pub fn list_chronological(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn list_reverse_chronological(&self) -> Vec<Transaction> {
        self.transactions.iter().rev().cloned().collect()
    }

    /// Drops entries from the visible log. The balance is left as is.
    pub(crate) fn prune_history(&mut self, keep: impl FnMut(&Transaction) -> bool) {
        self.transactions.retain(keep);
    }

    fn append(
        &mut self,
        kind: TransactionKind,
        amount: u32,
        description: String,
        at: DateTime<Utc>,
    ) -> Transaction {
        let id = self.next_id.max(1);
        self.next_id = id.saturating_add(1);
        let tx = Transaction {
            id,
            timestamp: at,
            description,
            amount,
            kind,
        };
        self.balance = self.balance.saturating_add(tx.signed_amount());
        self.transactions.push(tx.clone());
        tx
    }
}
