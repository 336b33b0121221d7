//! Root component that exposes the session to the UI tree.
//!
//! The bootstrap owns initialization order: it builds the store, calls
//! `init`, and only then mounts [`App`], so no component observes the
//! pre-restore state.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use crate::state::session::{CurrentUser, SessionStore};

#[cfg(feature = "hydrate")]
pub type AppStorage = crate::storage::BrowserStorage;
#[cfg(not(feature = "hydrate"))]
pub type AppStorage = crate::storage::MemoryStorage;

/// Context handle for the app-wide session.
pub type SessionContext = StoredValue<SessionStore<AppStorage>, LocalStorage>;

/// Fetch the session provided by [`App`], if mounted under it.
pub fn use_session() -> Option<SessionContext> {
    use_context::<SessionContext>()
}

/// Status line for the header.
fn session_label(user: Option<&CurrentUser>) -> String {
    let Some(user) = user else {
        return "Not signed in".to_owned();
    };
    match user.as_value().get("name").and_then(|n| n.as_str()) {
        Some(name) if !name.trim().is_empty() => format!("Signed in as {}", name.trim()),
        _ => "Signed in".to_owned(),
    }
}

#[component]
pub fn App(session: SessionStore<AppStorage>) -> impl IntoView {
    provide_meta_context();

    let user = session.current_user();
    let logged_in = session.is_logged_in();
    let session: SessionContext = StoredValue::new_local(session);
    provide_context(session);

    let on_logout = move |_| {
        if let Err(e) = session.with_value(SessionStore::logout) {
            leptos::logging::warn!("logout failed: {e}");
        }
    };

    view! {
        <Title text="Session"/>
        <header class="session-bar">
            <span class="session-bar__status">{move || session_label(user.get().as_ref())}</span>
            <Show when=move || logged_in.get()>
                <button class="session-bar__logout" on:click=on_logout>"Log out"</button>
            </Show>
        </header>
    }
}
