//! The active-route cell.
//!
//! Readers clone an `Arc<Route>` or hold a read guard for a whole tracking
//! cycle; a reroute replaces the `Arc` under a write lock.  A route is never
//! mutated in place, so a reader sees either the old route or the new one,
//! never a mix.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use nav_route::Route;

struct Slot {
    route:    Arc<Route>,
    revision: u64,
}

/// Shared handle to the route a trip currently follows.
///
/// Cloning shares the cell, so presentation code can hold a handle and read
/// the latest route while the trip runs.
#[derive(Clone)]
pub struct ActiveRoute {
    slot: Arc<RwLock<Slot>>,
}

/// Read access for one tracking cycle.
pub struct RouteGuard<'a> {
    guard: RwLockReadGuard<'a, Slot>,
}

impl RouteGuard<'_> {
    pub fn route(&self) -> &Route {
        &self.guard.route
    }

    pub fn revision(&self) -> u64 {
        self.guard.revision
    }
}

impl ActiveRoute {
    pub fn new(route: Route) -> Self {
        Self { slot: Arc::new(RwLock::new(Slot { route: Arc::new(route), revision: 0 })) }
    }

    /// Hold the current route until the guard drops; swaps wait meanwhile.
    pub fn read(&self) -> RouteGuard<'_> {
        // Routes are immutable, so a panicked reader cannot leave the slot
        // half-written; recover the guard instead of propagating poison.
        RouteGuard { guard: self.slot.read().unwrap_or_else(PoisonError::into_inner) }
    }

    /// The current route and its revision.
    pub fn snapshot(&self) -> (Arc<Route>, u64) {
        let guard = self.read();
        (Arc::clone(&guard.guard.route), guard.revision())
    }

    pub fn revision(&self) -> u64 {
        self.read().revision()
    }

    /// Replace the route; returns the new revision.
    pub fn swap(&self, route: Route) -> u64 {
        let route = Arc::new(route);
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.route = route;
        slot.revision += 1;
        slot.revision
    }
}

impl std::fmt::Debug for ActiveRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.read();
        f.debug_struct("ActiveRoute")
            .field("revision", &guard.revision())
            .field("route", guard.route())
            .finish()
    }
}
