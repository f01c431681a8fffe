use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use time::OffsetDateTime;

use agent_registry::load_agents;
use manicode::app::ClientApp;
use manicode::auth::AuthHost;
use manicode::theme::theme_by_name;
use manicode::transcript::{
    logo_block, ContentBlock, MessageVariant, AGENT_LIST_BLOCK_ID, INTRO_TEXT, LOGO_GLYPH,
    LOADED_AGENTS_ID_PREFIX, VALIDATION_ERROR_ID_PREFIX,
};

fn at(seconds: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(seconds).expect("valid timestamp")
}

fn project_with_agents(home: &Path, files: &[(&str, &str)]) -> PathBuf {
    let agents_dir = home.join("project").join(".agents");
    fs::create_dir_all(&agents_dir).expect("create agents dir");
    for (name, json) in files {
        let path = agents_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create nested agents dir");
        }
        fs::write(path, json).expect("write agent definition");
    }
    agents_dir
}

fn seeded_app(home: &Path, agents_dir: &Path) -> ClientApp {
    let mut app = ClientApp::new(theme_by_name(Some("plain")), Some(home.to_path_buf()), 80);
    app.on_agents_loaded(load_agents(agents_dir));
    app.sync_transcript(at(1_700_000_000));
    app
}

const REVIEWER_JSON: &str =
    r#"{"id":"reviewer","displayName":"Reviewer","model":"anthropic/claude-sonnet-4"}"#;

#[test]
fn loading_agents_seeds_logo_intro_and_collapsed_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    let agents_dir = project_with_agents(dir.path(), &[("review.json", REVIEWER_JSON)]);

    let app = seeded_app(dir.path(), &agents_dir);

    assert_eq!(app.messages.len(), 1);
    let seeded = &app.messages[0];
    assert!(seeded.id.starts_with(LOADED_AGENTS_ID_PREFIX));
    assert_eq!(seeded.variant, MessageVariant::Ai);
    assert_eq!(seeded.blocks.len(), 3);

    assert!(matches!(
        &seeded.blocks[0],
        ContentBlock::Text { content, margin_top: 2, margin_bottom: 1 }
            if content.contains(LOGO_GLYPH)
    ));
    assert!(matches!(
        &seeded.blocks[1],
        ContentBlock::Rendered { lines }
            if lines[0] == INTRO_TEXT && lines[1] == "Directory ~/project"
    ));
    assert!(matches!(
        &seeded.blocks[2],
        ContentBlock::AgentList { id, agents, .. }
            if id == AGENT_LIST_BLOCK_ID && agents.len() == 1 && agents[0].id == "reviewer"
    ));
    assert!(app.is_collapsed(AGENT_LIST_BLOCK_ID));
}

#[test]
fn invalid_definitions_seed_a_validation_error_message() {
    let dir = tempfile::tempdir().expect("tempdir");
    let agents_dir = project_with_agents(
        dir.path(),
        &[(
            "broken.json",
            r#"{"id":"planner","displayName":"","model":""}"#,
        )],
    );

    let app = seeded_app(dir.path(), &agents_dir);

    assert_eq!(app.messages.len(), 2);
    let error_message = &app.messages[1];
    assert!(error_message.id.starts_with(VALIDATION_ERROR_ID_PREFIX));
    assert_eq!(error_message.variant, MessageVariant::Error);

    let ContentBlock::Rendered { lines } = &error_message.blocks[0] else {
        panic!("expected a rendered banner block");
    };
    assert!(lines
        .iter()
        .any(|line| line.contains("2 agents have validation issues")));
    // planner never loaded, so its entries carry no file path
    assert!(lines.iter().any(|line| line == "planner"));
    assert!(lines.iter().any(|line| line == "planner_2"));
    assert!(lines
        .iter()
        .any(|line| line == "  displayName: must be a non-empty string"));
    assert!(lines
        .iter()
        .any(|line| line == "  model: must be a non-empty string"));
}

#[test]
fn duplicate_agents_report_with_the_registered_file_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let agents_dir = project_with_agents(
        dir.path(),
        &[
            ("core/review.json", REVIEWER_JSON),
            ("zz_dupe.json", REVIEWER_JSON),
        ],
    );

    let app = seeded_app(dir.path(), &agents_dir);

    let ContentBlock::Rendered { lines } = &app.messages[1].blocks[0] else {
        panic!("expected a rendered banner block");
    };
    assert!(lines
        .iter()
        .any(|line| line == "reviewer (.agents/core/review.json)"));
    assert!(lines
        .iter()
        .any(|line| line == "  id: duplicate of agent 'reviewer'"));
}

#[test]
fn snapshot_changes_refresh_the_first_message_in_place() {
    let dir = tempfile::tempdir().expect("tempdir");
    let agents_dir = project_with_agents(dir.path(), &[("review.json", REVIEWER_JSON)]);
    let mut app = seeded_app(dir.path(), &agents_dir);

    app.push_user_message("hello", at(1_700_000_010));
    let seeded_id = app.messages[0].id.clone();

    app.set_active_agent(Some("reviewer".to_string()));
    app.sync_transcript(at(1_700_000_020));

    assert_eq!(app.messages.len(), 2);
    assert_eq!(app.messages[0].id, seeded_id);
    assert_eq!(app.messages[0].blocks.len(), 3);
    assert_eq!(app.messages[1].content, "hello");
}

#[test]
fn width_change_swaps_the_logo_without_touching_siblings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let agents_dir = project_with_agents(dir.path(), &[("review.json", REVIEWER_JSON)]);
    let mut app = seeded_app(dir.path(), &agents_dir);

    app.set_width(24);

    let seeded = &app.messages[0];
    assert_eq!(seeded.blocks.len(), 3);
    let expected = format!("\n\n{}", logo_block(24));
    assert!(matches!(
        &seeded.blocks[0],
        ContentBlock::Text { content, margin_top: 0, margin_bottom: 0 } if *content == expected
    ));
    assert!(matches!(
        &seeded.blocks[1],
        ContentBlock::Rendered { lines } if lines[0] == INTRO_TEXT
    ));
    assert!(matches!(
        &seeded.blocks[2],
        ContentBlock::AgentList { id, .. } if id == AGENT_LIST_BLOCK_ID
    ));
}

#[test]
fn reset_chat_reseeds_with_a_fresh_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    let agents_dir = project_with_agents(dir.path(), &[("review.json", REVIEWER_JSON)]);
    let mut app = seeded_app(dir.path(), &agents_dir);
    let first_id = app.messages[0].id.clone();

    app.reset_chat();
    assert!(app.messages.is_empty());

    app.sync_transcript(at(1_700_000_200));
    assert_eq!(app.messages.len(), 1);
    assert_ne!(app.messages[0].id, first_id);
    assert!(app.is_collapsed(AGENT_LIST_BLOCK_ID));
}

#[test]
fn empty_agents_directory_still_seeds_the_intro() {
    let dir = tempfile::tempdir().expect("tempdir");
    let agents_dir = project_with_agents(dir.path(), &[]);

    let app = seeded_app(dir.path(), &agents_dir);

    assert_eq!(app.messages.len(), 1);
    assert!(matches!(
        &app.messages[0].blocks[2],
        ContentBlock::AgentList { agents, .. } if agents.is_empty()
    ));
}
