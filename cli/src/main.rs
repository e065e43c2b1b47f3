use clap::{Args, Parser, Subcommand, ValueEnum};
use hub_guard::{AppRoute, Role, RouteDecision, User, UserState, decide};
use serde_json::{Value, json};

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("profile id must not be empty; pass --profile-id or set HUB_GUARD_PROFILE_ID")]
    EmptyProfileId,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "hub-guard", about = "Evaluate Hub route guard decisions")]
struct Cli {
    /// Profile id of the fixture user (also fills the `/profile/{id}` route in `matrix`).
    #[arg(long, env = "HUB_GUARD_PROFILE_ID", default_value = "42", global = true)]
    profile_id: String,

    /// Emit one JSON object per decision instead of aligned text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide a single navigation.
    Decide(DecideCommand),
    /// Decide every fixture x credential x known route.
    Matrix,
}

#[derive(Args, Debug)]
struct DecideCommand {
    #[arg(long, value_enum)]
    user: UserFixture,

    /// Treat the viewer as holding a credential.
    #[arg(long)]
    credential: bool,

    /// Requested path, e.g. `/admin`.
    path: String,
}

/// Canned session outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum UserFixture {
    Pending,
    Absent,
    Unconfirmed,
    Confirmed,
    Admin,
    ConnectionError,
    Deleted,
}

impl UserFixture {
    const ALL: [Self; 7] = [
        Self::Pending,
        Self::Absent,
        Self::Unconfirmed,
        Self::Confirmed,
        Self::Admin,
        Self::ConnectionError,
        Self::Deleted,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Absent => "absent",
            Self::Unconfirmed => "unconfirmed",
            Self::Confirmed => "confirmed",
            Self::Admin => "admin",
            Self::ConnectionError => "connection-error",
            Self::Deleted => "deleted",
        }
    }

    fn user_state(self, profile_id: &str) -> UserState {
        let user = |confirmed: bool, role: &str| {
            UserState::Found(User {
                profile_id: profile_id.to_owned(),
                confirmed,
                role: Role { kind: role.to_owned() },
            })
        };
        match self {
            Self::Pending => UserState::Pending,
            Self::Absent => UserState::Absent,
            Self::Unconfirmed => user(false, "authenticated"),
            Self::Confirmed => user(true, "authenticated"),
            Self::Admin => user(true, "admin"),
            Self::ConnectionError => UserState::ConnectionError,
            Self::Deleted => UserState::AccountDeleted,
        }
    }
}

/// One evaluated navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Evaluation {
    fixture: UserFixture,
    credential: bool,
    route: AppRoute,
    decision: RouteDecision,
}

impl Evaluation {
    /// What the viewer ends up seeing, including the router's 404 fallback.
    fn run(fixture: UserFixture, credential: bool, route: AppRoute, profile_id: &str) -> Self {
        let decision = decide(&fixture.user_state(profile_id), credential, &route).resolve_for(&route);
        tracing::debug!(user = fixture.name(), credential, %route, ?decision, "evaluated");
        Self { fixture, credential, route, decision }
    }

    fn to_json(&self) -> Value {
        json!({
            "user": self.fixture.name(),
            "credential": self.credential,
            "path": self.route.to_string(),
            "decision": self.decision,
        })
    }

    fn to_line(&self) -> String {
        format!(
            "{:<17} {:<11} {:<20} {}",
            self.fixture.name(),
            if self.credential { "credential" } else { "anonymous" },
            self.route.to_string(),
            describe(&self.decision)
        )
    }
}

fn describe(decision: &RouteDecision) -> String {
    match decision {
        RouteDecision::Defer => "defer".to_owned(),
        RouteDecision::RenderChildren => "render".to_owned(),
        RouteDecision::RedirectTo(target) => format!("redirect {target}"),
        RouteDecision::ShowError(code) => format!("error {}", code.as_u16()),
    }
}

fn matrix(profile_id: &str) -> Vec<Evaluation> {
    let mut rows = Vec::new();
    for fixture in UserFixture::ALL {
        for credential in [true, false] {
            for route in AppRoute::known(profile_id) {
                rows.push(Evaluation::run(fixture, credential, route, profile_id));
            }
        }
    }
    rows
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let profile_id = cli.profile_id.trim();
    if profile_id.is_empty() {
        return Err(CliError::EmptyProfileId);
    }

    let rows = match cli.command {
        Command::Decide(cmd) => vec![Evaluation::run(cmd.user, cmd.credential, AppRoute::parse(&cmd.path), profile_id)],
        Command::Matrix => matrix(profile_id),
    };

    for row in &rows {
        if cli.json {
            println!("{}", serde_json::to_string(&row.to_json())?);
        } else {
            println!("{}", row.to_line());
        }
    }
    Ok(())
}
