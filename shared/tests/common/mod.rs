#![allow(dead_code)]

use crux_core::testing::{AppTester, Update};
use shared::auth::PasswordInput;
use shared::capabilities::StorageKey;
use shared::local_store::{execute, KeyValueStore, MemoryStore};
use shared::{App, Effect, Event, Model, ViewModel, ADMIN_PASSWORD, ADMIN_USERNAME};
use std::collections::VecDeque;

/// Drives the app the way a shell would: every key-value effect is resolved
/// against `store` and callback events are fed back until the queue is empty.
pub struct Harness<S: KeyValueStore = MemoryStore> {
    pub app: AppTester<App, Effect>,
    pub model: Model,
    pub store: S,
    pub renders: usize,
}

impl Harness<MemoryStore> {
    pub fn booted() -> Self {
        Self::boot(MemoryStore::new())
    }
}

impl<S: KeyValueStore> Harness<S> {
    pub fn boot(store: S) -> Self {
        let mut harness = Self {
            app: AppTester::default(),
            model: Model::default(),
            store,
            renders: 0,
        };
        harness.send(Event::Startup);
        harness
    }

    pub fn send(&mut self, event: Event) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let update = self.app.update(event, &mut self.model);
            self.drain(update, &mut queue);
        }
    }

    fn drain(&mut self, update: Update<Effect, Event>, queue: &mut VecDeque<Event>) {
        queue.extend(update.events);
        for effect in update.effects {
            match effect {
                Effect::Render(_) => self.renders += 1,
                Effect::KeyValue(mut request) => {
                    let result = execute(&mut self.store, &request.operation);
                    let update = self
                        .app
                        .resolve(&mut request, result)
                        .expect("key-value request should resolve");
                    self.drain(update, queue);
                }
            }
        }
    }

    pub fn login_with(&mut self, username: &str, password: &str) {
        self.send(Event::UsernameChanged {
            value: username.to_string(),
        });
        self.send(Event::PasswordChanged {
            value: PasswordInput::new(password),
        });
        self.send(Event::LoginSubmitted);
    }

    pub fn login(&mut self) {
        self.login_with(ADMIN_USERNAME, ADMIN_PASSWORD);
    }

    pub fn stored(&self, key: StorageKey) -> Option<String> {
        self.store
            .get(key.as_str())
            .expect("store read")
            .map(|bytes| String::from_utf8(bytes).expect("stored value is utf-8"))
    }

    pub fn view(&self) -> ViewModel {
        self.app.view(&self.model)
    }
}

/// Seeds a memory store with raw string values.
pub fn store_with(entries: &[(StorageKey, &str)]) -> MemoryStore {
    let mut store = MemoryStore::new();
    for (key, value) in entries {
        store
            .set(key.as_str(), value.as_bytes().to_vec())
            .expect("seed store");
    }
    store
}
