use crate::catalog::Catalog;
use crate::errors::TrackerError;
use crate::ledger::Ledger;
use crate::models::{
    CatalogKind, ChoreDefinition, ItemId, RewardDefinition, SortOrder, TodayEntry, TrackerView,
    Transaction, TransactionId, TransactionKind,
};
use crate::reset::{ResetMarker, apply_daily_reset};
use crate::snapshot::{Snapshot, parse_import};
use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{info, warn};

const COMPLETED_PREFIX: &str = "Completed: ";
const REDEEMED_PREFIX: &str = "Redeemed: ";

/// The whole application state and the intents that change it.
///
/// Every method either fails before touching anything or applies its change
/// in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracker {
    chores: Catalog<ChoreDefinition>,
    rewards: Catalog<RewardDefinition>,
    ledger: Ledger,
    marker: ResetMarker,
    chore_sort_order: SortOrder,
    reward_sort_order: SortOrder,
    is_dark_mode: bool,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::from_snapshot(Snapshot::default())
    }
}

impl Tracker {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            chores: Catalog::from_items(snapshot.chores),
            rewards: Catalog::from_items(snapshot.rewards),
            ledger: Ledger::from_parts(snapshot.balance, snapshot.transactions),
            marker: ResetMarker {
                last_reset_date: snapshot.last_reset_date,
            },
            chore_sort_order: snapshot.chore_sort_order,
            reward_sort_order: snapshot.reward_sort_order,
            is_dark_mode: snapshot.is_dark_mode,
        }
    }

    /// Persistable state. Editing flags are not part of it.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            balance: self.ledger.balance(),
            chores: self.chores.items().to_vec(),
            rewards: self.rewards.items().to_vec(),
            transactions: self.ledger.list_chronological().to_vec(),
            last_reset_date: self.marker.last_reset_date,
            chore_sort_order: self.chore_sort_order,
            reward_sort_order: self.reward_sort_order,
            is_dark_mode: self.is_dark_mode,
        }
    }

    pub fn balance(&self) -> i64 {
        self.ledger.balance()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn chores(&self) -> &Catalog<ChoreDefinition> {
        &self.chores
    }

    pub fn rewards(&self) -> &Catalog<RewardDefinition> {
        &self.rewards
    }

    pub fn complete_chore(&mut self, id: ItemId) -> Result<Transaction, TrackerError> {
        self.complete_chore_at(id, Utc::now())
    }

    pub fn complete_chore_at(
        &mut self,
        id: ItemId,
        at: DateTime<Utc>,
    ) -> Result<Transaction, TrackerError> {
        let chore = self.chores.lookup(id)?;
        let description = format!("{COMPLETED_PREFIX}{}", chore.name);
        let tx = self.ledger.record_credit_at(chore.points, description, at);
        info!(chore_id = id, points = tx.amount, balance = self.balance(), "chore completed");
        Ok(tx)
    }

    pub fn redeem_reward(&mut self, id: ItemId) -> Result<Transaction, TrackerError> {
        self.redeem_reward_at(id, Utc::now())
    }

    pub fn redeem_reward_at(
        &mut self,
        id: ItemId,
        at: DateTime<Utc>,
    ) -> Result<Transaction, TrackerError> {
        let reward = self.rewards.lookup(id)?;
        let description = format!("{REDEEMED_PREFIX}{}", reward.name);
        let tx = self
            .ledger
            .record_debit_at(reward.cost, description, at)
            .inspect_err(|err| warn!(reward_id = id, "redeem refused: {err}"))?;
        info!(reward_id = id, cost = tx.amount, balance = self.balance(), "reward redeemed");
        Ok(tx)
    }

    pub fn undo_transaction(&mut self, id: TransactionId) -> Result<Transaction, TrackerError> {
        let tx = self.ledger.undo(id)?;
        info!(transaction_id = id, balance = self.balance(), "transaction undone");
        Ok(tx)
    }

    pub fn add_chore(&mut self, name: &str, points: i64) -> Result<ChoreDefinition, TrackerError> {
        let chore = self.chores.add(name, points)?;
        info!(chore_id = chore.id, "chore added: {}", chore.name);
        Ok(chore)
    }

    pub fn remove_chore(&mut self, id: ItemId) -> Result<ChoreDefinition, TrackerError> {
        let chore = self.chores.remove(id)?;
        info!(chore_id = id, "chore removed: {}", chore.name);
        Ok(chore)
    }

    pub fn begin_chore_edit(&mut self, id: ItemId) -> Result<(), TrackerError> {
        self.chores.begin_edit(id)
    }

    pub fn cancel_chore_edit(&mut self, id: ItemId) -> Result<(), TrackerError> {
        self.chores.cancel_edit(id)
    }

    pub fn save_chore_edit(
        &mut self,
        id: ItemId,
        name: &str,
        points: i64,
    ) -> Result<ChoreDefinition, TrackerError> {
        self.chores.save_edit(id, name, points)
    }

    pub fn add_reward(&mut self, name: &str, cost: i64) -> Result<RewardDefinition, TrackerError> {
        let reward = self.rewards.add(name, cost)?;
        info!(reward_id = reward.id, "reward added: {}", reward.name);
        Ok(reward)
    }

    pub fn remove_reward(&mut self, id: ItemId) -> Result<RewardDefinition, TrackerError> {
        let reward = self.rewards.remove(id)?;
        info!(reward_id = id, "reward removed: {}", reward.name);
        Ok(reward)
    }

    pub fn begin_reward_edit(&mut self, id: ItemId) -> Result<(), TrackerError> {
        self.rewards.begin_edit(id)
    }

    pub fn cancel_reward_edit(&mut self, id: ItemId) -> Result<(), TrackerError> {
        self.rewards.cancel_edit(id)
    }

    pub fn save_reward_edit(
        &mut self,
        id: ItemId,
        name: &str,
        cost: i64,
    ) -> Result<RewardDefinition, TrackerError> {
        self.rewards.save_edit(id, name, cost)
    }

    pub fn set_sort_order(&mut self, catalog: CatalogKind, order: SortOrder) {
        match catalog {
            CatalogKind::Chores => self.chore_sort_order = order,
            CatalogKind::Rewards => self.reward_sort_order = order,
        }
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.is_dark_mode = !self.is_dark_mode;
        self.is_dark_mode
    }

    /// Runs the daily reset policy for `today`. Returns whether anything
    /// changed, so callers know when to persist.
    pub fn run_daily_reset(&mut self, today: NaiveDate) -> bool {
        let (ledger, marker) = apply_daily_reset(&self.ledger, &self.marker, today);
        if ledger == self.ledger && marker == self.marker {
            return false;
        }

        let pruned = self.ledger.list_chronological().len() - ledger.list_chronological().len();
        info!(%today, pruned, "daily reset applied");
        self.ledger = ledger;
        self.marker = marker;
        true
    }

    /// Merges an exported document onto the current state. A rejected
    /// document leaves the state untouched.
    pub fn import_document(&mut self, raw: &str) -> Result<(), TrackerError> {
        let patch = parse_import(raw).inspect_err(|err| warn!("import rejected: {err}"))?;
        *self = Self::from_snapshot(self.snapshot().merge(patch));
        info!(
            balance = self.balance(),
            transactions = self.ledger.list_chronological().len(),
            "state imported"
        );
        Ok(())
    }

    /// Credits created on `today`, named by the chore they came from.
    pub fn today_completed(&self, today: NaiveDate) -> Vec<TodayEntry> {
        self.ledger
            .list_chronological()
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Credit && tx.local_date() == today)
            .map(|tx| TodayEntry {
                transaction_id: tx.id,
                name: tx
                    .description
                    .strip_prefix(COMPLETED_PREFIX)
                    .unwrap_or(&tx.description)
                    .to_string(),
                amount: tx.amount,
            })
            .collect()
    }

    pub fn view(&self) -> TrackerView {
        self.view_at(Local::now().date_naive())
    }

    pub fn view_at(&self, today: NaiveDate) -> TrackerView {
        TrackerView {
            balance: self.balance(),
            chores: self.chores.list(self.chore_sort_order),
            rewards: self.rewards.list(self.reward_sort_order),
            today: self.today_completed(today),
            transactions: self.ledger.list_reverse_chronological(),
            chore_sort_order: self.chore_sort_order,
            reward_sort_order: self.reward_sort_order,
            is_dark_mode: self.is_dark_mode,
            editing_chore: self.chores.editing(),
            editing_reward: self.rewards.editing(),
        }
    }
}
