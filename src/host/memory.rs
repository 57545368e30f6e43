/// In-memory host used by unit tests
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use super::Host;
use crate::badge::Badge;
use crate::error::HostError;
use crate::tab_data::TabInfo;

#[derive(Default)]
pub struct MemoryHost {
    storage: RefCell<HashMap<String, Value>>,
    badges: RefCell<HashMap<i32, Badge>>,
    tabs: RefCell<HashMap<i32, Option<String>>>,
    active: Cell<Option<i32>>,
    storage_fails: Cell<bool>,
    badge_fails: Cell<bool>,
    puts: Cell<usize>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_tab(&self, tab_id: i32, url: Option<&str>) {
        self.tabs.borrow_mut().insert(tab_id, url.map(str::to_string));
    }

    pub fn activate(&self, tab_id: i32) {
        self.active.set(Some(tab_id));
    }

    pub fn insert(&self, key: &str, value: Value) {
        self.storage.borrow_mut().insert(key.to_string(), value);
    }

    pub fn raw(&self, key: &str) -> Option<Value> {
        self.storage.borrow().get(key).cloned()
    }

    pub fn badge(&self, tab_id: i32) -> Option<Badge> {
        self.badges.borrow().get(&tab_id).cloned()
    }

    pub fn puts(&self) -> usize {
        self.puts.get()
    }

    pub fn fail_storage(&self, fail: bool) {
        self.storage_fails.set(fail);
    }

    pub fn fail_badge(&self, fail: bool) {
        self.badge_fails.set(fail);
    }
}

#[async_trait(?Send)]
impl Host for MemoryHost {
    async fn active_tab(&self) -> Result<Option<TabInfo>, HostError> {
        Ok(self.active.get().map(|id| {
            let url = self.tabs.borrow().get(&id).cloned().flatten();
            TabInfo { id, url }
        }))
    }

    async fn tab_url(&self, tab_id: i32) -> Result<Option<String>, HostError> {
        match self.tabs.borrow().get(&tab_id) {
            Some(url) => Ok(url.clone()),
            None => Err(HostError::Api(format!("No tab with id: {}", tab_id))),
        }
    }

    async fn set_badge(&self, tab_id: i32, badge: &Badge) -> Result<(), HostError> {
        if self.badge_fails.get() {
            return Err(HostError::Api("action unavailable".to_string()));
        }
        self.badges.borrow_mut().insert(tab_id, badge.clone());
        Ok(())
    }

    async fn store_put(&self, key: &str, value: Value) -> Result<(), HostError> {
        if self.storage_fails.get() {
            return Err(HostError::Api("QUOTA_BYTES quota exceeded".to_string()));
        }
        self.puts.set(self.puts.get() + 1);
        self.storage.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    async fn store_get(&self, key: &str) -> Result<Option<Value>, HostError> {
        if self.storage_fails.get() {
            return Err(HostError::Api("storage unavailable".to_string()));
        }
        Ok(self.storage.borrow().get(key).cloned())
    }
}
