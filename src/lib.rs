//! # session-store
//!
//! Browser session for a Leptos front-end: the signed-in user held in a
//! reactive signal and mirrored to `localStorage` so it survives reloads.
//!
//! [`state::session::SessionStore`] is the core. [`storage`] abstracts the
//! persistence medium and [`app`] is the thin root component the bootstrap
//! mounts after restoring the session.

pub mod app;
pub mod config;
pub mod state;
pub mod storage;

pub use config::{DEFAULT_STORAGE_KEY, SessionConfig};
pub use state::session::{CurrentUser, InitOutcome, SessionError, SessionSnapshot, SessionStore, SubscriptionId};
pub use storage::{KeyValueStore, MemoryStorage, StorageError};

/// Browser entry point: restore the session, then mount the UI.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger already installed: {e}");
    }

    let storage = match storage::BrowserStorage::local() {
        Ok(storage) => storage,
        Err(e) => {
            leptos::logging::error!("cannot start session: {e}");
            return;
        }
    };
    let session = SessionStore::new(storage);
    session.init();

    leptos::mount::mount_to_body(move || {
        use app::App;
        use leptos::prelude::*;

        view! { <App session/> }
    });
}
