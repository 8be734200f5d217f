//! In-memory, view-scoped ownership of comparison sessions.
//!
//! Each session is owned by the view that created it: created when a
//! comparison mounts, dropped on navigation or after sitting idle.
//! Nothing here is persisted. The registry also carries the
//! stale-response guard: async results fetched for a session are
//! applied only while the session still exists at the revision the
//! fetch started from.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use db::models::{
    laptop_product::LaptopProduct, mobile_product::MobileProduct, product_kind::ProductKind,
};
use serde::Serialize;
use tokio::{task::JoinHandle, time::interval};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use super::comparison::{AddRejection, ComparisonSession, SessionPhase};

/// A product of either kind, for the layers that cannot be generic.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(untagged)]
pub enum AnyProduct {
    Mobile(MobileProduct),
    Laptop(LaptopProduct),
}

impl AnyProduct {
    pub fn id(&self) -> Uuid {
        match self {
            AnyProduct::Mobile(p) => p.id,
            AnyProduct::Laptop(p) => p.id,
        }
    }

    pub fn kind(&self) -> ProductKind {
        match self {
            AnyProduct::Mobile(_) => ProductKind::Mobile,
            AnyProduct::Laptop(_) => ProductKind::Laptop,
        }
    }
}

/// A session of either kind. The kind is fixed at creation; every
/// mutation checks it, so mixed-kind comparisons cannot form.
#[derive(Debug, Clone)]
pub enum SessionEntry {
    Mobile(ComparisonSession<MobileProduct>),
    Laptop(ComparisonSession<LaptopProduct>),
}

/// Result of pushing a product into a kind-erased session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotChange {
    Added,
    Rejected(AddRejection),
    KindMismatch,
}

impl SessionEntry {
    pub fn kind(&self) -> ProductKind {
        match self {
            SessionEntry::Mobile(_) => ProductKind::Mobile,
            SessionEntry::Laptop(_) => ProductKind::Laptop,
        }
    }

    pub fn anchor_id(&self) -> Uuid {
        match self {
            SessionEntry::Mobile(s) => s.anchor_id(),
            SessionEntry::Laptop(s) => s.anchor_id(),
        }
    }

    pub fn product_ids(&self) -> Vec<Uuid> {
        match self {
            SessionEntry::Mobile(s) => s.product_ids(),
            SessionEntry::Laptop(s) => s.product_ids(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.product_ids().len()
    }

    pub fn open_slots(&self) -> usize {
        match self {
            SessionEntry::Mobile(s) => s.open_slots(),
            SessionEntry::Laptop(s) => s.open_slots(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionEntry::Mobile(s) => s.phase(),
            SessionEntry::Laptop(s) => s.phase(),
        }
    }

    pub fn add(&mut self, product: AnyProduct) -> SlotChange {
        let outcome = match (self, product) {
            (SessionEntry::Mobile(s), AnyProduct::Mobile(p)) => s.add(p),
            (SessionEntry::Laptop(s), AnyProduct::Laptop(p)) => s.add(p),
            _ => return SlotChange::KindMismatch,
        };
        match outcome {
            Ok(()) => SlotChange::Added,
            Err(rejection) => SlotChange::Rejected(rejection),
        }
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        match self {
            SessionEntry::Mobile(s) => s.remove(id),
            SessionEntry::Laptop(s) => s.remove(id),
        }
    }
}

/// Identity of a session at the moment a fetch began. A late result is
/// applied only while `is_current` still holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTicket {
    pub session_id: Uuid,
    pub revision: u64,
}

struct Tracked {
    entry: SessionEntry,
    revision: u64,
    touched_at: Instant,
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<DashMap<Uuid, Tracked>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, entry: SessionEntry) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.insert(
            id,
            Tracked {
                entry,
                revision: 0,
                touched_at: Instant::now(),
            },
        );
        debug!(session_id = %id, "comparison session created");
        id
    }

    pub fn snapshot(&self, id: Uuid) -> Option<SessionEntry> {
        let mut tracked = self.inner.get_mut(&id)?;
        tracked.touched_at = Instant::now();
        Some(tracked.entry.clone())
    }

    pub fn kind(&self, id: Uuid) -> Option<ProductKind> {
        self.inner.get(&id).map(|t| t.entry.kind())
    }

    pub fn ticket(&self, id: Uuid) -> Option<SessionTicket> {
        self.inner.get(&id).map(|t| SessionTicket {
            session_id: id,
            revision: t.revision,
        })
    }

    /// False once the session is gone or its slots changed since the
    /// ticket was issued; the caller discards its result.
    pub fn is_current(&self, ticket: SessionTicket) -> bool {
        self.inner
            .get(&ticket.session_id)
            .is_some_and(|t| t.revision == ticket.revision)
    }

    /// Runs a slot mutation and bumps the revision, invalidating any
    /// tickets issued before it.
    pub fn mutate<R>(&self, id: Uuid, f: impl FnOnce(&mut SessionEntry) -> R) -> Option<R> {
        let mut tracked = self.inner.get_mut(&id)?;
        tracked.touched_at = Instant::now();
        tracked.revision += 1;
        Some(f(&mut tracked.entry))
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.inner.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drops sessions not touched within `max_age`.
    pub fn sweep_idle(&self, max_age: Duration) -> usize {
        let before = self.inner.len();
        self.inner.retain(|_, t| t.touched_at.elapsed() <= max_age);
        before - self.inner.len()
    }

    /// Spawn the background sweep loop.
    pub fn spawn_sweeper(self, poll: Duration, max_age: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut tick = interval(poll);
            loop {
                tick.tick().await;
                let removed = self.sweep_idle(max_age);
                if removed > 0 {
                    debug!(removed, "dropped idle comparison sessions");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn phone(name: &str) -> MobileProduct {
        MobileProduct {
            id: Uuid::new_v4(),
            name: name.to_string(),
            brand: "Acme".to_string(),
            price: 0,
            image_url: None,
            gallery_images: None,
            display: None,
            resolution: None,
            chipset: None,
            ram: None,
            storage: None,
            color: None,
            battery: None,
            camera: None,
            front_camera: None,
            os: None,
            sim: None,
            weight: None,
            dimensions: None,
            network_bands: None,
            sensors: None,
            nfc: None,
            fast_charging: None,
            fingerprint: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn laptop(name: &str) -> LaptopProduct {
        LaptopProduct {
            id: Uuid::new_v4(),
            name: name.to_string(),
            brand: "Acme".to_string(),
            price: 0,
            image_url: None,
            gallery_images: None,
            display: None,
            resolution: None,
            processor: None,
            graphics: None,
            ram: None,
            ram_type: None,
            storage: None,
            storage_type: None,
            color: None,
            battery: None,
            os: None,
            weight: None,
            dimensions: None,
            ports: None,
            webcam: None,
            backlit_keyboard: None,
            touchscreen: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn create_snapshot_and_remove() {
        let registry = SessionRegistry::new();
        let id = registry.create(SessionEntry::Mobile(ComparisonSession::new(phone("A"))));

        let entry = registry.snapshot(id).unwrap();
        assert_eq!(entry.kind(), ProductKind::Mobile);
        assert_eq!(entry.slot_count(), 1);

        assert!(registry.remove(id));
        assert!(registry.snapshot(id).is_none());
    }

    #[test]
    fn mutation_invalidates_earlier_tickets() {
        let registry = SessionRegistry::new();
        let id = registry.create(SessionEntry::Mobile(ComparisonSession::new(phone("A"))));

        let ticket = registry.ticket(id).unwrap();
        assert!(registry.is_current(ticket));

        let change = registry
            .mutate(id, |entry| entry.add(AnyProduct::Mobile(phone("B"))))
            .unwrap();
        assert_eq!(change, SlotChange::Added);

        // The in-flight result from before the add is now stale.
        assert!(!registry.is_current(ticket));
        assert!(registry.is_current(registry.ticket(id).unwrap()));
    }

    #[test]
    fn dropped_sessions_fail_the_ticket_check() {
        let registry = SessionRegistry::new();
        let id = registry.create(SessionEntry::Mobile(ComparisonSession::new(phone("A"))));
        let ticket = registry.ticket(id).unwrap();

        registry.remove(id);
        assert!(!registry.is_current(ticket));
    }

    #[test]
    fn mixed_kinds_cannot_enter_one_session() {
        let registry = SessionRegistry::new();
        let id = registry.create(SessionEntry::Mobile(ComparisonSession::new(phone("A"))));

        let intruder = AnyProduct::Laptop(laptop("L"));
        assert_eq!(intruder.kind(), ProductKind::Laptop);

        let change = registry.mutate(id, |entry| entry.add(intruder)).unwrap();
        assert_eq!(change, SlotChange::KindMismatch);
        assert_eq!(registry.snapshot(id).unwrap().slot_count(), 1);
    }

    #[test]
    fn any_product_exposes_its_record_identity() {
        let p = phone("A");
        let id = p.id;
        let wrapped = AnyProduct::Mobile(p);
        assert_eq!(wrapped.id(), id);
        assert_eq!(wrapped.kind(), ProductKind::Mobile);
    }

    #[test]
    fn sweep_drops_only_idle_sessions() {
        let registry = SessionRegistry::new();
        registry.create(SessionEntry::Mobile(ComparisonSession::new(phone("A"))));

        assert_eq!(registry.sweep_idle(Duration::from_secs(60)), 0);
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.sweep_idle(Duration::ZERO), 1);
        assert!(registry.is_empty());
    }
}
