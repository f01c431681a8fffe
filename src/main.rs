use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use log::{info, warn};
use serde_json::json;
use time::OffsetDateTime;

use analytics_gateway::{AnalyticsConfig, AnalyticsGateway, HttpAnalyticsClient};
use manicode::app::{ClientApp, SessionOps};
use manicode::auth::{AuthController, CachedCredentialsIdentity, IdentityClient, IdentityError};
use manicode::config::EnvConfig;
use manicode::theme::theme_by_name;
use manicode::tui::render_screen;
use manicode::widgets::AgentMode;

const DEFAULT_WIDTH: usize = 80;
const ANONYMOUS_USER: &str = "anonymous";

/// Performs session-level effects requested during command handling. Login
/// and logout are recorded and executed after the submit call returns, once
/// the app borrow is released.
struct SessionBridge<'a> {
    analytics: &'a AnalyticsGateway,
    user_id: Option<String>,
    login_requested: bool,
    logout_requested: bool,
}

impl SessionBridge<'_> {
    fn distinct_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(ANONYMOUS_USER)
    }
}

impl SessionOps for SessionBridge<'_> {
    fn request_login(&mut self) {
        self.login_requested = true;
    }

    fn request_logout(&mut self) {
        self.logout_requested = true;
    }

    fn on_mode_selected(&mut self, mode: AgentMode) {
        self.analytics.track_event(
            "mode_selected",
            self.distinct_id(),
            Some(json!({ "mode": mode.label() })),
        );
    }
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = EnvConfig::from_env();
    let environment = config.environment_name().to_string();
    info!("starting manicode ({environment})");

    let theme = theme_by_name(config.theme.as_deref());
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let agents_dir = match config.agents_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir()
            .map(|cwd| cwd.join(".agents"))
            .unwrap_or_else(|_| PathBuf::from(".agents")),
    };

    let analytics = AnalyticsGateway::new(
        environment.clone(),
        AnalyticsConfig::from_env(),
        HttpAnalyticsClient::factory(),
    );

    let mut app = ClientApp::new(theme, home, DEFAULT_WIDTH);
    let mut auth = AuthController::new();

    app.on_agents_loaded(agent_registry::load_agents(&agents_dir));
    auth.on_require_auth_changed(&mut app, config.require_auth);

    let cached = credential_store::get_user_credentials();
    let mut identity = CachedCredentialsIdentity::new();
    auth.on_identity_result(&mut app, identity.resolve(), cached.as_ref());

    let stdin = io::stdin();
    let stdout = io::stdout();

    loop {
        app.sync_transcript(OffsetDateTime::now_utc());
        auth.run_deferred_focus(&mut app);

        let lines = render_screen(&mut app, &auth, &environment);
        {
            let mut out = stdout.lock();
            for line in &lines {
                writeln!(out, "{line}")?;
            }
            out.flush()?;
        }

        if app.should_exit {
            break;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let mut bridge = SessionBridge {
            analytics: &analytics,
            user_id: auth.user().map(|user| user.id.clone()),
            login_requested: false,
            logout_requested: false,
        };
        app.on_submit(&mut bridge, &line, OffsetDateTime::now_utc());
        let login_requested = bridge.login_requested;
        let logout_requested = bridge.logout_requested;

        if login_requested {
            handle_login(&mut app, &mut auth, &analytics);
        }
        if logout_requested {
            auth.on_identity_result(&mut app, Err(IdentityError::new("signed out")), None);
            app.push_notice("Signed out", OffsetDateTime::now_utc());
        }
    }

    auth.teardown();
    analytics.flush();
    Ok(())
}

fn handle_login(app: &mut ClientApp, auth: &mut AuthController, analytics: &AnalyticsGateway) {
    match credential_store::get_user_credentials() {
        Some(user) => {
            let user_id = user.id.clone();
            auth.on_login_success(app, user);
            analytics.track_event("login", &user_id, None);
        }
        None => {
            warn!("login requested but no credentials are saved");
            app.push_notice(
                "No saved credentials. Sign in from the web app first.",
                OffsetDateTime::now_utc(),
            );
        }
    }
}
