//! Current-user session for the browser client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The bootstrap builds one [`SessionStore`], calls [`SessionStore::init`]
//! before mounting, and hands the store to components through context. Pages
//! read `current_user`/`is_logged_in` reactively; login and logout flows call
//! the mutators, which keep memory and the persisted slot in step.
//!
//! ERROR HANDLING
//! ==============
//! `init` never fails: unreadable or corrupt slots are logged and discarded so
//! a bad value cannot block startup on every reload. `login` and `logout`
//! surface storage failures as [`SessionError`] and leave handling to the UI.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SessionConfig;
use crate::storage::{KeyValueStore, StorageError};

/// Error returned by [`SessionStore`] mutators and typed accessors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The persisted slot could not be written or removed.
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
    /// A typed record passed to [`SessionStore::login_as`] is not JSON-serializable.
    #[error("failed to serialize user: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The current user does not match the type requested from [`SessionStore::user_as`].
    #[error("current user does not match requested type: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Opaque user record supplied at login. The store does not inspect it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrentUser(Value);

impl CurrentUser {
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for CurrentUser {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Session state as seen by an observer right after a change.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<CurrentUser>,
    pub is_logged_in: bool,
}

/// What [`SessionStore::init`] found in the persisted slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    /// No slot (or an unreadable medium); the session starts logged out.
    Empty,
    /// The slot held a user, which is now current.
    Restored,
    /// The slot held unusable data and was removed.
    Recovered,
}

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Rc<dyn Fn(&SessionSnapshot)>;

/// Owner of the current user, mirrored to a single [`KeyValueStore`] slot.
pub struct SessionStore<S: KeyValueStore> {
    storage: S,
    config: SessionConfig,
    user: RwSignal<Option<CurrentUser>>,
    is_logged_in: Memo<bool>,
    observers: RefCell<Vec<(SubscriptionId, Observer)>>,
    next_subscription: Cell<u64>,
    notifying: Cell<bool>,
    pending: Cell<bool>,
    owner: Owner,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Store persisting under [`crate::config::DEFAULT_STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, SessionConfig::default())
    }

    pub fn with_config(storage: S, config: SessionConfig) -> Self {
        let owner = Owner::new();
        let (user, is_logged_in) = owner.with(|| {
            let user = RwSignal::new(None::<CurrentUser>);
            let is_logged_in = Memo::new(move |_| user.with(Option::is_some));
            (user, is_logged_in)
        });
        Self {
            storage,
            config,
            user,
            is_logged_in,
            observers: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
            notifying: Cell::new(false),
            pending: Cell::new(false),
            owner,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Restore the user persisted by a previous page load.
    ///
    /// Call once before the UI first reads the session.
    pub fn init(&self) -> InitOutcome {
        let key = self.config.storage_key();
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return InitOutcome::Empty,
            Err(e) => {
                leptos::logging::warn!("session slot {key} unreadable: {e}");
                return InitOutcome::Empty;
            }
        };

        match serde_json::from_str::<Option<CurrentUser>>(&raw) {
            Ok(Some(user)) => {
                leptos::logging::log!("session restored from {key}");
                self.replace(Some(user));
                InitOutcome::Restored
            }
            Ok(None) => {
                leptos::logging::warn!("session slot {key} holds no user; removing");
                self.discard_slot(key);
                InitOutcome::Recovered
            }
            Err(e) => {
                leptos::logging::error!("error parsing stored user data: {e}");
                self.discard_slot(key);
                InitOutcome::Recovered
            }
        }
    }

    /// Make `user` current and persist it.
    ///
    /// A JSON `null` user is treated as [`SessionStore::logout`] so the slot
    /// never holds a serialized absent user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] when the slot cannot be written (for
    /// example, quota exceeded). The in-memory session is unchanged then.
    pub fn login(&self, user: impl Into<CurrentUser>) -> Result<(), SessionError> {
        let user = user.into();
        if user.as_value().is_null() {
            return self.logout();
        }
        let raw = serde_json::to_string(&user)?;
        self.storage.set(self.config.storage_key(), &raw)?;
        self.replace(Some(user));
        Ok(())
    }

    /// [`SessionStore::login`] with a caller-defined record type.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Serialize`] when `record` has no JSON form, or
    /// [`SessionError::Storage`] when the slot cannot be written.
    pub fn login_as<T: Serialize>(&self, record: &T) -> Result<(), SessionError> {
        let value = serde_json::to_value(record)?;
        self.login(value)
    }

    /// Clear the session and remove the persisted slot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] when the slot cannot be removed. The
    /// in-memory session is cleared regardless.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.replace(None);
        self.storage.remove(self.config.storage_key())?;
        Ok(())
    }

    /// Reactive current user.
    pub fn current_user(&self) -> ReadSignal<Option<CurrentUser>> {
        self.user.read_only()
    }

    /// Reactive `current_user().is_some()`.
    pub fn is_logged_in(&self) -> Memo<bool> {
        self.is_logged_in
    }

    pub fn current_user_untracked(&self) -> Option<CurrentUser> {
        self.user.get_untracked()
    }

    pub fn is_logged_in_untracked(&self) -> bool {
        self.is_logged_in.get_untracked()
    }

    /// Decode the current user into `T`, `Ok(None)` when logged out.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Decode`] when the record does not fit `T`.
    pub fn user_as<T: DeserializeOwned>(&self) -> Result<Option<T>, SessionError> {
        self.user.with_untracked(|user| match user {
            Some(user) => serde_json::from_value(user.as_value().clone())
                .map(Some)
                .map_err(SessionError::Decode),
            None => Ok(None),
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.current_user_untracked(),
            is_logged_in: self.is_logged_in_untracked(),
        }
    }

    /// Register `observer` to run synchronously after every session change.
    pub fn subscribe(&self, observer: impl Fn(&SessionSnapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.observers.borrow_mut().push((id, Rc::new(observer)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    fn discard_slot(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            leptos::logging::warn!("failed to remove session slot {key}: {e}");
        }
    }

    fn replace(&self, next: Option<CurrentUser>) {
        let changed = self.user.with_untracked(|current| *current != next);
        if !changed {
            return;
        }
        self.user.set(next);
        self.notify();
    }

    /// Deliver the latest snapshot to every observer.
    ///
    /// A change made by an observer mid-delivery abandons the current pass and
    /// restarts with a fresh snapshot, so no observer is handed a state older
    /// than one it could already read from the store.
    fn notify(&self) {
        if self.notifying.get() {
            self.pending.set(true);
            return;
        }
        self.notifying.set(true);
        loop {
            self.pending.set(false);
            // Observers may (un)subscribe while running.
            let observers: Vec<Observer> = self.observers.borrow().iter().map(|(_, o)| Rc::clone(o)).collect();
            let snapshot = self.snapshot();
            for observer in observers {
                if self.pending.get() {
                    break;
                }
                observer(&snapshot);
            }
            if !self.pending.get() {
                break;
            }
        }
        self.notifying.set(false);
    }
}

impl<S: KeyValueStore> Drop for SessionStore<S> {
    fn drop(&mut self) {
        self.owner.cleanup();
    }
}
