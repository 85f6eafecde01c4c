use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::room::Room;

pub const ROOT_PATH: &str = "/";

const MAX_CACHED_LISTS: usize = 1024;

pub fn document_path(room_id: &str) -> String {
    format!("/documents/{room_id}")
}

#[derive(Debug, Default)]
struct Views {
    generation: u64,
    lists: HashMap<String, Vec<Room>>,
}

/// Document lists rendered at the root view, keyed by user email.
#[derive(Debug, Default)]
pub struct ViewCache {
    views: Mutex<Views>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn views(&self) -> MutexGuard<'_, Views> {
        self.views.lock().unwrap_or_else(|poisoned| {
            tracing::error!("view cache lock poisoned, continuing with inner state");
            PoisonError::into_inner(poisoned)
        })
    }

    pub fn generation(&self) -> u64 {
        self.views().generation
    }

    pub fn list(&self, email: &str) -> Option<Vec<Room>> {
        self.views().lists.get(email).cloned()
    }

    pub fn store_list(&self, email: &str, rooms: &[Room], generation: u64) -> bool {
        let mut views = self.views();
        // revalidated while the list was being fetched
        if views.generation != generation {
            tracing::debug!(email, "list fetched before revalidation, not caching");
            return false;
        }
        if views.lists.len() >= MAX_CACHED_LISTS && !views.lists.contains_key(email) {
            views.lists.clear();
        }
        views.lists.insert(email.to_string(), rooms.to_vec());
        true
    }

    pub fn revalidate(&self, path: &str) {
        tracing::debug!(path, "revalidating cached view");
        let mut views = self.views();
        views.generation += 1;
        if path == ROOT_PATH {
            views.lists.clear();
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.views().lists.len()
    }
}
