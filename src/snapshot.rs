use crate::errors::TrackerError;
use crate::models::{ChoreDefinition, RewardDefinition, SortOrder, Transaction};
use crate::reset::lenient_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys an imported document must carry to be accepted.
pub const REQUIRED_IMPORT_KEYS: [&str; 4] = ["balance", "chores", "rewards", "transactions"];

/// Largest id or balance magnitude a document may carry: the integer range
/// JSON numbers hold exactly. Keeps id sequences and balance arithmetic far
/// from overflow.
pub const MAX_DOCUMENT_INTEGER: u64 = (1 << 53) - 1;

/// Full persisted state. Field names match the documents written by earlier
/// versions, so old exports keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub balance: i64,
    pub chores: Vec<ChoreDefinition>,
    pub rewards: Vec<RewardDefinition>,
    pub transactions: Vec<Transaction>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub last_reset_date: Option<NaiveDate>,
    pub chore_sort_order: SortOrder,
    pub reward_sort_order: SortOrder,
    pub is_dark_mode: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            balance: 0,
            chores: Vec::new(),
            rewards: Vec::new(),
            transactions: Vec::new(),
            last_reset_date: None,
            chore_sort_order: SortOrder::ValueAscending,
            reward_sort_order: SortOrder::ValueDescending,
            is_dark_mode: false,
        }
    }
}

/// A possibly partial document. Absent fields leave the base value alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPatch {
    pub balance: Option<i64>,
    pub chores: Option<Vec<ChoreDefinition>>,
    pub rewards: Option<Vec<RewardDefinition>>,
    pub transactions: Option<Vec<Transaction>>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub last_reset_date: Option<NaiveDate>,
    pub chore_sort_order: Option<SortOrder>,
    pub reward_sort_order: Option<SortOrder>,
    pub is_dark_mode: Option<bool>,
}

impl SnapshotPatch {
    /// Rejects ids and balances outside [`MAX_DOCUMENT_INTEGER`].
    pub fn check(&self) -> Result<(), TrackerError> {
        if let Some(balance) = self.balance {
            if balance.unsigned_abs() > MAX_DOCUMENT_INTEGER {
                return Err(TrackerError::ImportFormat(format!(
                    "balance {balance} is out of range"
                )));
            }
        }

        let ids = self
            .chores
            .iter()
            .flatten()
            .map(|c| ("chore", c.id))
            .chain(self.rewards.iter().flatten().map(|r| ("reward", r.id)))
            .chain(self.transactions.iter().flatten().map(|tx| ("transaction", tx.id)));
        for (kind, id) in ids {
            if id > MAX_DOCUMENT_INTEGER {
                return Err(TrackerError::ImportFormat(format!(
                    "{kind} id {id} is out of range"
                )));
            }
        }
        Ok(())
    }
}

impl Snapshot {
    pub fn merge(self, patch: SnapshotPatch) -> Self {
        Self {
            balance: patch.balance.unwrap_or(self.balance),
            chores: patch.chores.unwrap_or(self.chores),
            rewards: patch.rewards.unwrap_or(self.rewards),
            transactions: patch.transactions.unwrap_or(self.transactions),
            last_reset_date: patch.last_reset_date.or(self.last_reset_date),
            chore_sort_order: patch.chore_sort_order.unwrap_or(self.chore_sort_order),
            reward_sort_order: patch.reward_sort_order.unwrap_or(self.reward_sort_order),
            is_dark_mode: patch.is_dark_mode.unwrap_or(self.is_dark_mode),
        }
    }
}

/// Parses a user-supplied export. Nothing is applied here; the caller merges
/// the patch only once this returns `Ok`.
pub fn parse_import(raw: &str) -> Result<SnapshotPatch, TrackerError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| TrackerError::ImportFormat(format!("could not parse file: {err}")))?;

    let Some(object) = value.as_object() else {
        return Err(TrackerError::ImportFormat(
            "expected a JSON object at the top level".into(),
        ));
    };

    let missing: Vec<&str> = REQUIRED_IMPORT_KEYS
        .iter()
        .copied()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(TrackerError::ImportFormat(format!(
            "missing keys: {}",
            missing.join(", ")
        )));
    }

    let patch: SnapshotPatch =
        serde_json::from_value(value).map_err(|err| TrackerError::ImportFormat(err.to_string()))?;
    patch.check()?;
    Ok(patch)
}
