use crate::ledger::Ledger;
use crate::models::TransactionKind;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResetMarker {
    #[serde(deserialize_with = "lenient_date", default)]
    pub last_reset_date: Option<NaiveDate>,
}

impl ResetMarker {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            last_reset_date: Some(date),
        }
    }
}

/// Starts a new day's history.
///
/// When `today` differs from the marker, every debit is kept, credits are kept
/// only if they were created on `today`, and the marker moves to `today`.
/// The balance carries over unchanged: pruned credits still count.
pub fn apply_daily_reset(
    ledger: &Ledger,
    marker: &ResetMarker,
    today: NaiveDate,
) -> (Ledger, ResetMarker) {
    if marker.last_reset_date == Some(today) {
        return (ledger.clone(), *marker);
    }

    let mut next = ledger.clone();
    next.prune_history(|tx| tx.kind == TransactionKind::Debit || tx.local_date() == today);
    (next, ResetMarker::on(today))
}

/// Accepts ISO dates as well as the `M/D/YYYY` form older documents used;
/// anything else reads as "never reset".
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
}
