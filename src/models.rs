use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type ItemId = u64;
pub type TransactionId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoreDefinition {
    pub id: ItemId,
    pub name: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardDefinition {
    pub id: ItemId,
    pub name: String,
    pub cost: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

/// A single point-affecting entry in the ledger.
///
/// `id` comes from the ledger's monotonic sequence; `timestamp` is the
/// creation instant and decides which calendar day the entry belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TransactionRecord")]
pub struct Transaction {
    pub id: TransactionId,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub amount: u32,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    /// Calendar day of creation in the local time zone.
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.with_timezone(&Local).date_naive()
    }

    /// Effect of this entry on the balance.
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            TransactionKind::Credit => i64::from(self.amount),
            TransactionKind::Debit => -i64::from(self.amount),
        }
    }
}

// Older documents used the millisecond creation time as the id and carried no
// separate timestamp.
#[derive(Deserialize)]
struct TransactionRecord {
    id: TransactionId,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    description: String,
    amount: u32,
    #[serde(rename = "type")]
    kind: TransactionKind,
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        let timestamp = record.timestamp.unwrap_or_else(|| {
            i64::try_from(record.id)
                .ok()
                .and_then(DateTime::from_timestamp_millis)
                .unwrap_or_default()
        });
        Self {
            id: record.id,
            timestamp,
            description: record.description,
            amount: record.amount,
            kind: record.kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "value-asc")]
    ValueAscending,
    #[serde(rename = "value-desc")]
    ValueDescending,
    #[serde(rename = "alpha")]
    Alphabetical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Chores,
    Rewards,
}

#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    pub name: String,
    #[serde(alias = "points", alias = "cost")]
    pub value: i64,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub catalog: CatalogKind,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayEntry {
    pub transaction_id: TransactionId,
    pub name: String,
    pub amount: u32,
}

/// Read-only projection handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerView {
    pub balance: i64,
    pub chores: Vec<ChoreDefinition>,
    pub rewards: Vec<RewardDefinition>,
    pub today: Vec<TodayEntry>,
    pub transactions: Vec<Transaction>,
    pub chore_sort_order: SortOrder,
    pub reward_sort_order: SortOrder,
    pub is_dark_mode: bool,
    pub editing_chore: Option<ItemId>,
    pub editing_reward: Option<ItemId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_transaction_takes_timestamp_from_id() {
        let tx: Transaction = serde_json::from_str(
            r#"{"id":1767607200000,"description":"Completed: Dishes","amount":5,"type":"credit"}"#,
        )
        .unwrap();
        assert_eq!(tx.timestamp.timestamp_millis(), 1_767_607_200_000);
        assert_eq!(tx.kind, TransactionKind::Credit);
    }

    #[test]
    fn transaction_serializes_kind_as_type() {
        let tx = Transaction {
            id: 3,
            timestamp: DateTime::from_timestamp_millis(0).unwrap(),
            description: "Redeemed: Movie".into(),
            amount: 4,
            kind: TransactionKind::Debit,
        };
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["type"], "debit");
        assert_eq!(tx.signed_amount(), -4);

        let back: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn sort_order_uses_short_names() {
        let order: SortOrder = serde_json::from_str(r#""alpha""#).unwrap();
        assert_eq!(order, SortOrder::Alphabetical);
        assert_eq!(
            serde_json::to_string(&SortOrder::ValueDescending).unwrap(),
            r#""value-desc""#
        );
    }

    #[test]
    fn item_request_accepts_points_or_cost() {
        let chore: ItemRequest = serde_json::from_str(r#"{"name":"Dishes","points":5}"#).unwrap();
        let reward: ItemRequest = serde_json::from_str(r#"{"name":"Movie","cost":-1}"#).unwrap();
        assert_eq!(chore.value, 5);
        assert_eq!(reward.value, -1);
    }
}
