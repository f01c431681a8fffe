use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use time::OffsetDateTime;

use agent_registry::{LoadedAgents, LoadedAgentsData, LocalAgentInfo};
use credential_store::{save_credentials_to, CredentialsFile, User};
use manicode::app::ClientApp;
use manicode::auth::{AuthController, CachedCredentialsIdentity, IdentityClient, IdentityError};
use manicode::theme::theme_by_name;
use manicode::transcript::LOADED_AGENTS_ID_PREFIX;

fn at(seconds: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(seconds).expect("valid timestamp")
}

fn ada() -> User {
    User {
        id: "user-1".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        auth_token: "token-1".to_string(),
    }
}

fn seeded_app() -> ClientApp {
    let mut app = ClientApp::new(theme_by_name(Some("plain")), Some(PathBuf::from("/work")), 80);
    app.on_agents_loaded(LoadedAgents {
        data: LoadedAgentsData {
            agents: vec![LocalAgentInfo {
                id: "reviewer".to_string(),
                display_name: "Reviewer".to_string(),
                file_path: PathBuf::from("/work/project/.agents/review.json"),
            }],
            agents_dir: PathBuf::from("/work/project/.agents"),
        },
        validation_errors: Vec::new(),
    });
    app
}

#[test]
fn login_resets_the_transcript_and_focuses_the_input() {
    let mut app = seeded_app();
    app.sync_transcript(at(1_700_000_000));
    app.push_user_message("hi", at(1_700_000_010));
    let seeded_id = app.messages[0].id.clone();
    assert!(!app.input_focused());

    let mut auth = AuthController::new();
    auth.on_login_success(&mut app, ada());

    assert!(app.messages.is_empty());
    assert!(app.input_focused());
    assert_eq!(auth.is_authenticated(), Some(true));
    assert_eq!(auth.user().map(|user| user.name.as_str()), Some("Ada"));

    app.sync_transcript(at(1_700_000_100));
    assert_eq!(app.messages.len(), 1);
    assert!(app.messages[0].id.starts_with(LOADED_AGENTS_ID_PREFIX));
    assert_ne!(app.messages[0].id, seeded_id);

    auth.run_deferred_focus(&mut app);
    assert!(app.input_focused());
}

#[test]
fn saved_credentials_sign_the_session_in_until_deleted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("credentials.json");
    save_credentials_to(&path, &CredentialsFile::new(ada())).expect("save should succeed");

    let cached = credential_store::get_user_credentials_from(&path);
    let mut identity = CachedCredentialsIdentity::at(&path);
    let mut app = seeded_app();
    let mut auth = AuthController::new();

    auth.on_identity_result(&mut app, identity.resolve(), cached.as_ref());
    assert_eq!(auth.is_authenticated(), Some(true));
    assert!(app.input_focused());
    let user = auth.user().expect("user should be set");
    assert_eq!(user.name, "Ada");
    assert_eq!(user.auth_token, "token-1");

    fs::remove_file(&path).expect("remove credentials");
    auth.on_identity_result(&mut app, identity.resolve(), None);
    assert_eq!(auth.is_authenticated(), Some(false));
    assert!(auth.user().is_none());
}

#[test]
fn logout_keeps_the_transcript_but_relogin_reseeds_it() {
    let mut app = seeded_app();
    let mut auth = AuthController::new();
    app.sync_transcript(at(1_700_000_000));
    app.push_user_message("draft", at(1_700_000_010));
    let seeded_id = app.messages[0].id.clone();

    auth.on_identity_result(&mut app, Err(IdentityError::new("signed out")), None);
    assert_eq!(auth.is_authenticated(), Some(false));
    assert_eq!(app.messages.len(), 2);

    auth.on_login_success(&mut app, ada());
    assert!(app.messages.is_empty());

    app.sync_transcript(at(1_700_000_300));
    assert_eq!(app.messages.len(), 1);
    assert_ne!(app.messages[0].id, seeded_id);
}

#[test]
fn auth_requirement_drives_focus_through_the_app() {
    let mut app = seeded_app();
    let mut auth = AuthController::new();

    auth.on_require_auth_changed(&mut app, Some(true));
    assert_eq!(auth.is_authenticated(), Some(false));
    assert!(!app.input_focused());

    auth.on_require_auth_changed(&mut app, Some(false));
    assert_eq!(auth.is_authenticated(), Some(true));
    assert!(app.input_focused());
}
