use super::*;
use hub_guard::ErrorCode;

#[test]
fn cli_parses_decide_command() {
    let cli = Cli::try_parse_from(["hub-guard", "decide", "--user", "connection-error", "--credential", "/admin"]).unwrap();
    let Command::Decide(cmd) = cli.command else {
        panic!("expected decide command");
    };
    assert_eq!(cmd.user, UserFixture::ConnectionError);
    assert!(cmd.credential);
    assert_eq!(cmd.path, "/admin");
    assert!(!cli.json);
}

#[test]
fn cli_rejects_unknown_fixture() {
    assert!(Cli::try_parse_from(["hub-guard", "decide", "--user", "root", "/"]).is_err());
}

#[test]
fn fixture_names_match_value_enum_names() {
    for fixture in UserFixture::ALL {
        let parsed = UserFixture::from_str(fixture.name(), false).unwrap();
        assert_eq!(parsed, fixture);
    }
}

#[test]
fn fixtures_carry_profile_id() {
    let state = UserFixture::Admin.user_state("7");
    let user = state.user().unwrap();
    assert_eq!(user.profile_id, "7");
    assert!(user.is_admin());
    assert!(!UserFixture::Unconfirmed.user_state("7").user().unwrap().confirmed);
}

#[test]
fn evaluation_applies_router_fallback() {
    let row = Evaluation::run(UserFixture::Confirmed, true, AppRoute::parse("/nope"), "42");
    assert_eq!(row.decision, RouteDecision::ShowError(ErrorCode::NotFound));
}

#[test]
fn evaluation_line_and_json() {
    let row = Evaluation::run(UserFixture::Confirmed, true, AppRoute::Login, "42");
    assert!(row.to_line().ends_with("redirect /profile/42"));
    assert_eq!(
        row.to_json(),
        json!({
            "user": "confirmed",
            "credential": true,
            "path": "/login",
            "decision": { "outcome": "redirect_to", "target": "/profile/42" }
        })
    );
}

#[test]
fn matrix_covers_every_combination() {
    let rows = matrix("42");
    assert_eq!(rows.len(), UserFixture::ALL.len() * 2 * AppRoute::known("42").len());
    assert!(
        rows.iter()
            .filter(|r| r.fixture == UserFixture::Pending)
            .all(|r| r.decision == RouteDecision::Defer)
    );
}

#[test]
fn describe_renders_each_outcome() {
    assert_eq!(describe(&RouteDecision::Defer), "defer");
    assert_eq!(describe(&RouteDecision::RenderChildren), "render");
    assert_eq!(describe(&RouteDecision::RedirectTo(AppRoute::AlmostDone)), "redirect /almost-done");
    assert_eq!(describe(&RouteDecision::ShowError(ErrorCode::ServiceUnavailable)), "error 503");
}
