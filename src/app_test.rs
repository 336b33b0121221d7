use super::*;
use serde_json::json;

#[test]
fn session_label_when_logged_out() {
    assert_eq!(session_label(None), "Not signed in");
}

#[test]
fn session_label_uses_name_field() {
    let user = CurrentUser::from(json!({"id": 1, "name": " Ann "}));
    assert_eq!(session_label(Some(&user)), "Signed in as Ann");
}

#[test]
fn session_label_without_name_is_generic() {
    let user = CurrentUser::from(json!({"id": 1}));
    assert_eq!(session_label(Some(&user)), "Signed in");
}

#[test]
fn session_label_ignores_non_string_name() {
    let user = CurrentUser::from(json!({"name": 42}));
    assert_eq!(session_label(Some(&user)), "Signed in");
}

#[test]
fn use_session_outside_app_is_none() {
    assert!(use_session().is_none());
}

#[test]
fn app_provides_session_to_descendants() {
    let storage = crate::storage::MemoryStorage::new();
    let session = SessionStore::new(storage.clone());
    session.login(json!({"id": 1, "name": "Ann"})).unwrap();

    let owner = Owner::new();
    owner.with(|| {
        let _view = App(AppProps::builder().session(session).build());

        let ctx = use_session().unwrap();
        assert!(ctx.with_value(SessionStore::is_logged_in_untracked));

        ctx.with_value(SessionStore::logout).unwrap();
        assert!(!ctx.with_value(SessionStore::is_logged_in_untracked));
    });
    assert!(storage.is_empty());
}
