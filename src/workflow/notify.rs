//! Keyed user notifications.
//!
//! A notice posted under a key replaces whatever was showing under that key,
//! so a "loading" notice turns into its "success" or "error" in place.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Mutex;

pub const KEY_PROOF_INIT: &str = "proof-init";
pub const KEY_PROOF_VERIFY: &str = "proof-verify";
pub const KEY_MINT_TX: &str = "mint-tx";

/// Notices kept in history; older ones are dropped first.
pub const HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Loading,
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub key: Option<String>,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct NotificationCenter {
    active: DashMap<String, Notice>,
    history: Mutex<VecDeque<Notice>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading(&self, key: &str, message: impl Into<String>) {
        self.post(Some(key), NoticeLevel::Loading, message.into());
    }

    pub fn success(&self, key: Option<&str>, message: impl Into<String>) {
        self.post(key, NoticeLevel::Success, message.into());
    }

    pub fn info(&self, key: Option<&str>, message: impl Into<String>) {
        self.post(key, NoticeLevel::Info, message.into());
    }

    pub fn error(&self, key: Option<&str>, message: impl Into<String>) {
        self.post(key, NoticeLevel::Error, message.into());
    }

    pub fn dismiss(&self, key: &str) {
        self.active.remove(key);
    }

    /// The notice currently showing under `key`.
    pub fn active(&self, key: &str) -> Option<Notice> {
        self.active.get(key).map(|n| n.value().clone())
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// The last [`HISTORY_CAPACITY`] notices posted, oldest first.
    pub fn history(&self) -> Vec<Notice> {
        match self.history.lock() {
            Ok(h) => h.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    fn post(&self, key: Option<&str>, level: NoticeLevel, message: String) {
        match level {
            NoticeLevel::Error => tracing::warn!(key = key.unwrap_or("-"), "{}", message),
            _ => tracing::info!(key = key.unwrap_or("-"), "{}", message),
        }

        let notice = Notice {
            key: key.map(str::to_string),
            level,
            message,
        };

        if let Some(key) = key {
            self.active.insert(key.to_string(), notice.clone());
        }

        let mut history = match self.history.lock() {
            Ok(h) => h,
            Err(poisoned) => poisoned.into_inner(),
        };
        if history.len() == HISTORY_CAPACITY {
            history.pop_front();
        }
        history.push_back(notice);
    }
}
