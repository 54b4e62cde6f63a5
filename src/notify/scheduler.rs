//! Reminder scheduler
//!
//! Decides, for one instant, which items warrant a reminder. The decision is
//! remembered per item as the day offset it last fired at, so a stable bucket
//! fires once while a bucket change ("tomorrow" -> "today") fires again.

use crate::bucketing::{self, Category};
use crate::clock::Clock;
use crate::error::{ExpiryError, Result};
use crate::pantry::{Item, ItemId};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, trace};

/// Intent to notify the user about one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub item_id: ItemId,
    pub item_name: String,
    pub category: Category,
}

impl NotificationEvent {
    pub fn day_offset(&self) -> i64 {
        self.category.day_offset
    }
}

/// Which day offsets trigger a reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerPolicy {
    /// Offsets `-overdue_days..=0` fire (0 = only "today")
    pub overdue_days: u32,
    /// Positive offsets that fire ahead of expiration, e.g. `{1, 3}`
    pub lead_days: BTreeSet<i64>,
    /// Local time of day before which ticks stay silent
    pub notify_after: Option<NaiveTime>,
}

impl TriggerPolicy {
    pub fn triggers(&self, day_offset: i64) -> bool {
        let overdue_floor = -i64::from(self.overdue_days);
        (overdue_floor..=0).contains(&day_offset) || self.lead_days.contains(&day_offset)
    }

    fn is_quiet(&self, time: NaiveTime) -> bool {
        self.notify_after.is_some_and(|after| time < after)
    }
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self {
            overdue_days: 0,
            lead_days: BTreeSet::from([1]),
            notify_after: None,
        }
    }
}

/// Per-item day offset at which a reminder was last emitted
///
/// Owned by the scheduler, not by `Item`. Entries are removed when their
/// item is purged or hard-deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderLedger {
    last_notified: BTreeMap<ItemId, i64>,
}

impl ReminderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_notified(&self, id: ItemId) -> Option<i64> {
        self.last_notified.get(&id).copied()
    }

    pub fn record(&mut self, id: ItemId, day_offset: i64) {
        self.last_notified.insert(id, day_offset);
    }

    pub fn forget(&mut self, id: ItemId) -> bool {
        self.last_notified.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.last_notified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_notified.is_empty()
    }

    /// Drop entries whose item no longer exists
    fn retain_known(&mut self, known: &HashSet<ItemId>) -> usize {
        let before = self.last_notified.len();
        self.last_notified.retain(|id, _| known.contains(id));
        before - self.last_notified.len()
    }
}

#[derive(Serialize, Deserialize)]
struct LedgerEntry {
    item: ItemId,
    day_offset: i64,
}

#[derive(Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    reminder: Vec<LedgerEntry>,
}

// TOML tables need string keys, so the ledger is stored as an array of entries
impl Serialize for ReminderLedger {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        LedgerFile {
            reminder: self
                .last_notified
                .iter()
                .map(|(item, day_offset)| LedgerEntry {
                    item: *item,
                    day_offset: *day_offset,
                })
                .collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ReminderLedger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let file = LedgerFile::deserialize(deserializer)?;
        Ok(Self {
            last_notified: file
                .reminder
                .into_iter()
                .map(|e| (e.item, e.day_offset))
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReminderScheduler {
    policy: TriggerPolicy,
    ledger: ReminderLedger,
}

impl ReminderScheduler {
    pub fn new(policy: TriggerPolicy) -> Self {
        Self {
            policy,
            ledger: ReminderLedger::new(),
        }
    }

    /// Resume with a previously persisted ledger
    pub fn with_ledger(mut self, ledger: ReminderLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn policy(&self) -> &TriggerPolicy {
        &self.policy
    }

    pub fn ledger(&self) -> &ReminderLedger {
        &self.ledger
    }

    /// One evaluation pass against the clock's current time
    ///
    /// `items` is the full store snapshot, soft-deleted items included. On a
    /// clock failure nothing is emitted and the ledger is left untouched.
    pub fn tick(&mut self, items: &[Item], clock: &dyn Clock) -> Result<Vec<NotificationEvent>> {
        let local = clock.local_now().map_err(|e| match e {
            ExpiryError::ClockUnavailable(_) => e,
            other => ExpiryError::ClockUnavailable(other.to_string()),
        })?;

        let known: HashSet<ItemId> = items.iter().map(|i| i.id()).collect();
        let dropped = self.ledger.retain_known(&known);
        if dropped > 0 {
            debug!(dropped, "dropped reminder state for removed items");
        }

        if self.policy.is_quiet(local.time()) {
            trace!(time = %local.time(), "before notify_after, deferring reminders");
            return Ok(Vec::new());
        }

        Ok(self.evaluate(items, local.date()))
    }

    /// Emit events for every live item whose offset triggers and has not
    /// already fired at that offset, in display order
    pub fn evaluate(&mut self, items: &[Item], today: NaiveDate) -> Vec<NotificationEvent> {
        let mut due: Vec<&Item> = items
            .iter()
            .filter(|item| item.is_live())
            .filter(|item| {
                let offset = bucketing::days_between(today, item.expiration_date());
                self.policy.triggers(offset) && self.ledger.last_notified(item.id()) != Some(offset)
            })
            .collect();
        due.sort_by(|a, b| bucketing::compare_items(a, b, today));

        due.into_iter()
            .map(|item| {
                let category = bucketing::categorize(item.expiration_date(), today);
                self.ledger.record(item.id(), category.day_offset);
                NotificationEvent {
                    item_id: item.id(),
                    item_name: item.name().to_string(),
                    category,
                }
            })
            .collect()
    }

    /// Forget reminder state for removed items; returns whether anything changed
    pub fn forget<I: IntoIterator<Item = ItemId>>(&mut self, ids: I) -> bool {
        let mut changed = false;
        for id in ids {
            changed |= self.ledger.forget(id);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucketing::Bucket;
    use crate::clock::ManualClock;
    use chrono::{Duration, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 20).unwrap()
    }

    fn item(id: u64, name: &str, offset: i64) -> Item {
        Item::new(
            ItemId::new(id),
            name,
            today() + Duration::days(offset),
            Utc::now(),
        )
    }

    fn policy(overdue_days: u32, lead: &[i64]) -> TriggerPolicy {
        TriggerPolicy {
            overdue_days,
            lead_days: lead.iter().copied().collect(),
            notify_after: None,
        }
    }

    #[test]
    fn trigger_set_covers_overdue_range_and_lead_days() {
        let p = policy(2, &[1, 3]);
        let fired: Vec<i64> = (-4..=4).filter(|o| p.triggers(*o)).collect();
        assert_eq!(fired, vec![-2, -1, 0, 1, 3]);
    }

    #[test]
    fn stable_state_does_not_refire() {
        let mut scheduler = ReminderScheduler::new(policy(0, &[1]));
        let items = vec![item(1, "Milk", 0), item(2, "Eggs", 1), item(3, "Rice", 9)];

        let first = scheduler.evaluate(&items, today());
        assert_eq!(first.len(), 2);
        assert!(scheduler.evaluate(&items, today()).is_empty());
    }

    #[test]
    fn bucket_transition_refires() {
        let mut scheduler = ReminderScheduler::new(policy(0, &[1]));
        let items = vec![item(1, "Milk", 1)];

        let first = scheduler.evaluate(&items, today());
        assert_eq!(first[0].category.bucket, Bucket::Tomorrow);

        let next_day = today() + Duration::days(1);
        let second = scheduler.evaluate(&items, next_day);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].category.bucket, Bucket::Today);
        assert_eq!(scheduler.ledger().last_notified(ItemId::new(1)), Some(0));
    }

    #[test]
    fn soft_deleted_items_never_fire_but_keep_state() {
        let mut scheduler = ReminderScheduler::new(policy(0, &[]));
        let mut items = vec![item(1, "Milk", 0)];
        scheduler.evaluate(&items, today());

        items[0].set_deletion_mark(Some(Utc::now()));
        let clock = ManualClock::at(today(), 9);
        assert!(scheduler.tick(&items, &clock).unwrap().is_empty());
        assert_eq!(scheduler.ledger().last_notified(ItemId::new(1)), Some(0));
    }

    #[test]
    fn unknown_items_are_dropped_from_ledger() {
        let mut scheduler = ReminderScheduler::new(policy(0, &[]));
        scheduler.evaluate(&[item(1, "Milk", 0)], today());

        let clock = ManualClock::at(today(), 9);
        let events = scheduler.tick(&[], &clock).unwrap();
        assert!(events.is_empty());
        assert!(scheduler.ledger().is_empty());
    }

    #[test]
    fn clock_failure_emits_nothing() {
        let mut scheduler = ReminderScheduler::new(policy(0, &[]));
        let clock = ManualClock::at(today(), 9);
        clock.fail();

        let result = scheduler.tick(&[item(1, "Milk", 0)], &clock);
        assert!(matches!(result, Err(ExpiryError::ClockUnavailable(_))));
        assert!(scheduler.ledger().is_empty());
    }

    #[test]
    fn quiet_hours_defer_without_losing_reminders() {
        let mut p = policy(0, &[]);
        p.notify_after = NaiveTime::from_hms_opt(8, 30, 0);
        let mut scheduler = ReminderScheduler::new(p);
        let items = vec![item(1, "Milk", 0)];

        let clock = ManualClock::at(today(), 7);
        assert!(scheduler.tick(&items, &clock).unwrap().is_empty());

        clock.advance(Duration::hours(2));
        assert_eq!(scheduler.tick(&items, &clock).unwrap().len(), 1);
    }

    #[test]
    fn events_follow_display_order() {
        let mut scheduler = ReminderScheduler::new(policy(3, &[1]));
        let items = vec![
            item(1, "milk", 1),
            item(2, "Bread", 0),
            item(3, "apple", 0),
            item(4, "Ham", -2),
        ];
        let names: Vec<String> = scheduler
            .evaluate(&items, today())
            .into_iter()
            .map(|e| e.item_name)
            .collect();
        assert_eq!(names, vec!["Ham", "apple", "Bread", "milk"]);
    }

    #[test]
    fn ledger_round_trips_through_toml() {
        let mut ledger = ReminderLedger::new();
        ledger.record(ItemId::new(4), -1);
        ledger.record(ItemId::new(7), 3);

        let text = toml::to_string(&ledger).unwrap();
        let restored: ReminderLedger = toml::from_str(&text).unwrap();
        assert_eq!(restored, ledger);
    }
}
