//! Shared settings handle with change subscribers

use std::sync::{Arc, Mutex, RwLock};

use super::Settings;

type Listener = Arc<dyn Fn(&Settings) + Send + Sync>;

/// Identifies a subscription for [`SettingsHandle::unsubscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct Inner {
    settings: RwLock<Settings>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: Mutex<u64>,
}

/// Application-owned settings, cheap to clone and share between threads
#[derive(Clone)]
pub struct SettingsHandle {
    inner: Arc<Inner>,
}

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(Inner {
                settings: RwLock::new(settings),
                listeners: Mutex::new(Vec::new()),
                next_id: Mutex::new(0),
            }),
        }
    }

    /// Copy of the current settings
    pub fn snapshot(&self) -> Settings {
        match self.inner.settings.read() {
            Ok(settings) => settings.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Apply a change and notify every subscriber with the result
    pub fn update<F>(&self, change: F) -> Settings
    where
        F: FnOnce(&mut Settings),
    {
        let updated = {
            let mut settings = match self.inner.settings.write() {
                Ok(settings) => settings,
                Err(poisoned) => poisoned.into_inner(),
            };
            change(&mut settings);
            settings.clone()
        };

        // Listeners may call back into the handle
        let listeners: Vec<Listener> = {
            let listeners = match self.inner.listeners.lock() {
                Ok(listeners) => listeners,
                Err(poisoned) => poisoned.into_inner(),
            };
            listeners.iter().map(|(_, listener)| Arc::clone(listener)).collect()
        };
        for listener in listeners {
            listener(&updated);
        }

        updated
    }

    /// Register a callback run after every [`update`](Self::update)
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Settings) + Send + Sync + 'static,
    {
        let id = {
            let mut next_id = match self.inner.next_id.lock() {
                Ok(next_id) => next_id,
                Err(poisoned) => poisoned.into_inner(),
            };
            *next_id += 1;
            SubscriptionId(*next_id)
        };

        let mut listeners = match self.inner.listeners.lock() {
            Ok(listeners) => listeners,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut listeners = match self.inner.listeners.lock() {
            Ok(listeners) => listeners,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.retain(|(listener_id, _)| *listener_id != id);
    }
}
