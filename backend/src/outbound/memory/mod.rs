//! In-process entity store implementing every repository port.
//!
//! Used when no database is configured and by behaviour tests. All tables
//! live behind a single mutex, so the check-then-insert sequences that the
//! database guards with constraints (one open reception per pickup point,
//! unique account email, items only in open receptions) are atomic here.
//! The lock is never held across an await point.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, ItemRepository, ItemRepositoryError,
    PickupPointRepository, PickupPointRepositoryError, ReceptionRepository,
    ReceptionRepositoryError,
};
use crate::domain::{
    Account, Email, Item, PickupPoint, PickupPointIdPage, Reception, ReceptionStatus, TimeWindow,
};

#[derive(Debug)]
struct StoredItem {
    seq: u64,
    item: Item,
}

#[derive(Debug, Default)]
struct Tables {
    pickup_points: HashMap<Uuid, PickupPoint>,
    receptions: HashMap<Uuid, Reception>,
    items: HashMap<Uuid, StoredItem>,
    accounts: HashMap<Uuid, Account>,
    next_item_seq: u64,
}

impl Tables {
    fn matches_window(&self, pvz_id: Uuid, window: TimeWindow) -> bool {
        !window.is_bounded()
            || self
                .receptions
                .values()
                .any(|reception| {
                    reception.pvz_id == pvz_id && window.contains(reception.started_at)
                })
    }

    fn reception_is_open(&self, reception_id: Uuid) -> bool {
        self.receptions
            .get(&reception_id)
            .is_some_and(Reception::is_open)
    }
}

fn newest_first(points: &mut [PickupPoint]) {
    points.sort_by(|a, b| {
        b.registered_at
            .cmp(&a.registered_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Shared in-memory store. Cloning yields another handle to the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|err| err.into_inner())
    }
}

#[async_trait]
impl PickupPointRepository for InMemoryStore {
    async fn create(&self, pickup_point: &PickupPoint) -> Result<(), PickupPointRepositoryError> {
        self.tables()
            .pickup_points
            .insert(pickup_point.id, pickup_point.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<PickupPoint, PickupPointRepositoryError> {
        self.tables()
            .pickup_points
            .get(&id)
            .cloned()
            .ok_or_else(|| PickupPointRepositoryError::not_found(id))
    }

    async fn get_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<PickupPoint>, PickupPointRepositoryError> {
        let tables = self.tables();
        Ok(ids
            .iter()
            .filter_map(|id| tables.pickup_points.get(id).cloned())
            .collect())
    }

    async fn list_ids_and_total(
        &self,
        limit: u32,
        offset: u64,
        window: TimeWindow,
    ) -> Result<PickupPointIdPage, PickupPointRepositoryError> {
        let tables = self.tables();
        let mut matching: Vec<PickupPoint> = tables
            .pickup_points
            .values()
            .filter(|point| tables.matches_window(point.id, window))
            .cloned()
            .collect();
        newest_first(&mut matching);

        let total = matching.len() as u64;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let ids = matching
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .map(|point| point.id)
            .collect();
        Ok(PickupPointIdPage { ids, total })
    }

    async fn list_all(&self) -> Result<Vec<PickupPoint>, PickupPointRepositoryError> {
        let mut points: Vec<PickupPoint> = self.tables().pickup_points.values().cloned().collect();
        newest_first(&mut points);
        Ok(points)
    }
}

#[async_trait]
impl ReceptionRepository for InMemoryStore {
    async fn create(&self, reception: &Reception) -> Result<(), ReceptionRepositoryError> {
        let mut tables = self.tables();
        if !tables.pickup_points.contains_key(&reception.pvz_id) {
            return Err(ReceptionRepositoryError::unknown_pickup_point(
                reception.pvz_id,
            ));
        }
        let already_open = reception.is_open()
            && tables
                .receptions
                .values()
                .any(|existing| existing.pvz_id == reception.pvz_id && existing.is_open());
        if already_open {
            return Err(ReceptionRepositoryError::open_conflict(reception.pvz_id));
        }
        tables.receptions.insert(reception.id, reception.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Reception, ReceptionRepositoryError> {
        self.tables()
            .receptions
            .get(&id)
            .cloned()
            .ok_or_else(|| ReceptionRepositoryError::not_found(id))
    }

    async fn find_open(&self, pvz_id: Uuid) -> Result<Reception, ReceptionRepositoryError> {
        self.tables()
            .receptions
            .values()
            .find(|reception| reception.pvz_id == pvz_id && reception.is_open())
            .cloned()
            .ok_or_else(|| ReceptionRepositoryError::no_open(pvz_id))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ReceptionStatus,
    ) -> Result<(), ReceptionRepositoryError> {
        let mut tables = self.tables();
        match tables.receptions.get_mut(&id) {
            Some(reception) if reception.status != status => {
                reception.status = status;
                Ok(())
            }
            _ => Err(ReceptionRepositoryError::not_found(id)),
        }
    }

    async fn list_by_pickup_points(
        &self,
        pvz_ids: &[Uuid],
        window: TimeWindow,
    ) -> Result<HashMap<Uuid, Vec<Reception>>, ReceptionRepositoryError> {
        let tables = self.tables();
        let mut grouped: HashMap<Uuid, Vec<Reception>> = HashMap::new();
        for reception in tables.receptions.values() {
            if pvz_ids.contains(&reception.pvz_id) && window.contains(reception.started_at) {
                grouped
                    .entry(reception.pvz_id)
                    .or_default()
                    .push(reception.clone());
            }
        }
        for group in grouped.values_mut() {
            group.sort_by(|a, b| {
                b.started_at
                    .cmp(&a.started_at)
                    .then_with(|| b.id.cmp(&a.id))
            });
        }
        Ok(grouped)
    }
}

#[async_trait]
impl ItemRepository for InMemoryStore {
    async fn create(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let mut tables = self.tables();
        if !tables.reception_is_open(item.reception_id) {
            return Err(ItemRepositoryError::reception_not_open(item.reception_id));
        }
        let seq = tables.next_item_seq;
        tables.next_item_seq += 1;
        tables.items.insert(
            item.id,
            StoredItem {
                seq,
                item: item.clone(),
            },
        );
        Ok(())
    }

    async fn find_last(&self, reception_id: Uuid) -> Result<Item, ItemRepositoryError> {
        self.tables()
            .items
            .values()
            .filter(|stored| stored.item.reception_id == reception_id)
            .max_by_key(|stored| (stored.item.created_at, stored.seq))
            .map(|stored| stored.item.clone())
            .ok_or_else(|| ItemRepositoryError::empty(reception_id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ItemRepositoryError> {
        let mut tables = self.tables();
        let removable = tables
            .items
            .get(&id)
            .is_some_and(|stored| tables.reception_is_open(stored.item.reception_id));
        if !removable {
            return Err(ItemRepositoryError::not_found(id));
        }
        tables.items.remove(&id);
        Ok(())
    }

    async fn list_by_receptions(
        &self,
        reception_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Item>>, ItemRepositoryError> {
        let tables = self.tables();
        let mut stored: Vec<&StoredItem> = tables
            .items
            .values()
            .filter(|stored| reception_ids.contains(&stored.item.reception_id))
            .collect();
        stored.sort_by_key(|stored| (stored.item.created_at, stored.seq));

        let mut grouped: HashMap<Uuid, Vec<Item>> = HashMap::new();
        for entry in stored {
            grouped
                .entry(entry.item.reception_id)
                .or_default()
                .push(entry.item.clone());
        }
        Ok(grouped)
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn create(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut tables = self.tables();
        if tables
            .accounts
            .values()
            .any(|existing| existing.email == account.email)
        {
            return Err(AccountRepositoryError::duplicate(account.email.as_str()));
        }
        tables.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(self
            .tables()
            .accounts
            .values()
            .find(|account| &account.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(self.tables().accounts.get(&id).cloned())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
