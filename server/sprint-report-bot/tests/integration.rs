//! Integration tests for the bot: Jira client, collection flow and the slash-command
//! handler, all against a wiremock server standing in for Jira and Slack.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use serde_json::json;
use sprint_report_bot::collect::collect_sprint_data;
use sprint_report_bot::config::{FormConfig, JiraConfig, ServerConfig, SlackConfig};
use sprint_report_bot::jira::JiraClient;
use sprint_report_bot::report::{build_report, run_report_task};
use sprint_report_bot::slack::{ReportRequest, ResponseType, SlashCommand, SlashResponse, HELP_TEXT, THINKING_TEXT};
use sprint_report_bot::{sprint_report_url, AppState, BotError, Config};
use wiremock::matchers::{basic_auth, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AGILE: &str = "/rest/agile/1.0";
const REPORT_PATH: &str = "/rest/greenhopper/1.0/rapid/charts/sprintreport";

fn config(server: &MockServer) -> Config {
  Config {
    jira: JiraConfig {
      host: "acme.atlassian.net".into(),
      user: "bot@acme.io".into(),
      token: "secret".into(),
      base_url: Some(server.uri()),
    },
    slack: SlackConfig {
      verification_token: "vtoken".into(),
      team_id: "T123".into(),
    },
    form: FormConfig {
      view_url: "https://forms.example/viewform".into(),
    },
    server: ServerConfig::default(),
  }
}

fn client(server: &MockServer) -> JiraClient {
  JiraClient::new(config(server).jira).unwrap()
}

fn board(id: u64, name: &str) -> serde_json::Value {
  json!({"id": id, "name": name, "type": "scrum", "location": {"projectId": 10000, "projectName": "Yoshi Web"}})
}

fn sprint(id: u64, name: &str, board_id: u64) -> serde_json::Value {
  json!({
    "id": id,
    "name": name,
    "state": "active",
    "startDate": "2024-03-04T09:00:00.000Z",
    "endDate": "2024-03-18T09:00:00.000Z",
    "originBoardId": board_id,
    "goal": "Ship login\nFix crash"
  })
}

fn sprint_report() -> serde_json::Value {
  json!({
    "contents": {
      "completedIssues": [
        {"key": "YOSHI-1", "typeName": "Story", "currentEstimateStatistic": {"statFieldValue": {"value": 5.0}}},
        {"key": "YOSHI-2", "typeName": "Bug", "currentEstimateStatistic": {"statFieldValue": {"value": 3.0}}}
      ],
      "issuesNotCompletedInCurrentSprint": [
        {"key": "YOSHI-3", "typeName": "Story", "currentEstimateStatistic": {"statFieldValue": {"value": 5.0}}}
      ],
      "puntedIssues": [
        {"key": "YOSHI-4", "typeName": "Task", "currentEstimateStatistic": {"statFieldValue": {"value": 2.0}}}
      ],
      "issueKeysAddedDuringSprint": {"YOSHI-2": true}
    }
  })
}

async fn mount_boards(server: &MockServer, boards: Vec<serde_json::Value>) {
  Mock::given(method("GET"))
    .and(path(format!("{AGILE}/board")))
    .and(query_param("projectKeyOrId", "YOSHI"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "maxResults": 50, "startAt": 0, "total": boards.len(), "isLast": true, "values": boards
    })))
    .mount(server)
    .await;
}

async fn mount_active_sprints(server: &MockServer, board_id: u64, sprints: Vec<serde_json::Value>) {
  Mock::given(method("GET"))
    .and(path(format!("{AGILE}/board/{board_id}/sprint")))
    .and(query_param("state", "active"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"values": sprints})))
    .mount(server)
    .await;
}

async fn mount_report(server: &MockServer, board_id: u64, sprint_id: u64) {
  Mock::given(method("GET"))
    .and(path(REPORT_PATH))
    .and(query_param("rapidViewId", board_id.to_string()))
    .and(query_param("sprintId", sprint_id.to_string()))
    .respond_with(ResponseTemplate::new(200).set_body_json(sprint_report()))
    .mount(server)
    .await;
}

#[tokio::test]
async fn client_sends_auth_and_accept_headers() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path(format!("{AGILE}/board/7")))
    .and(basic_auth("bot@acme.io", "secret"))
    .and(header("accept", "application/json"))
    .respond_with(ResponseTemplate::new(200).set_body_json(board(7, "YOSHI board")))
    .expect(1)
    .mount(&server)
    .await;

  let board = client(&server).get_board(7).await.unwrap().unwrap();
  assert_eq!(board.id, 7);
  assert_eq!(board.project_name(), Some("Yoshi Web"));
}

#[tokio::test]
async fn non_200_is_none_not_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path(format!("{AGILE}/sprint/99")))
    .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errorMessages": ["nope"]})))
    .mount(&server)
    .await;

  let sprint = client(&server).get_sprint(99).await.unwrap();
  assert!(sprint.is_none());
}

#[tokio::test]
async fn collects_explicit_sprint() {
  let server = MockServer::start().await;
  mount_boards(&server, vec![board(7, "YOSHI board")]).await;
  Mock::given(method("GET"))
    .and(path(format!("{AGILE}/sprint/1234")))
    .respond_with(ResponseTemplate::new(200).set_body_json(sprint(1234, "YOSHI Sprint 42", 7)))
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path(format!("{AGILE}/board/7")))
    .respond_with(ResponseTemplate::new(200).set_body_json(board(7, "YOSHI board")))
    .mount(&server)
    .await;
  mount_report(&server, 7, 1234).await;

  let data = collect_sprint_data(&client(&server), "YOSHI", Some(1234)).await.unwrap();
  assert_eq!(data.sprint_id, 1234);
  assert_eq!(data.sprint_number, "42");
  assert_eq!(data.board_name, "YOSHI board");
  assert_eq!(data.project_name, "Yoshi Web");
  assert_eq!(data.sprint_goals, vec!["Ship login", "Fix crash"]);
  assert!(data.sprint_start.is_some() && data.sprint_end.is_some());

  let m = data.metrics;
  assert_eq!(m.points.completed, 8);
  assert_eq!(m.points.committed, 10);
  assert_eq!(m.points.planned_completed, 5);
  assert_eq!(m.items.unplanned_bugs_completed, 1);
  assert_eq!(m.items.removed, 0);
}

#[tokio::test]
async fn picks_first_board_with_active_sprint() {
  let server = MockServer::start().await;
  mount_boards(
    &server,
    vec![board(1, "Kanban"), board(2, "Scrum A"), board(3, "Scrum B")],
  )
  .await;
  Mock::given(method("GET"))
    .and(path(format!("{AGILE}/board/1/sprint")))
    .respond_with(ResponseTemplate::new(400))
    .mount(&server)
    .await;
  mount_active_sprints(&server, 2, vec![sprint(20, "S20", 2)]).await;
  mount_active_sprints(&server, 3, vec![sprint(30, "S30", 3)]).await;
  mount_report(&server, 2, 20).await;

  let data = collect_sprint_data(&client(&server), "YOSHI", None).await.unwrap();
  assert_eq!(data.board_name, "Scrum A");
  assert_eq!(data.sprint_id, 20);
  assert_eq!(data.sprint_number, "20");
}

#[tokio::test]
async fn no_active_sprint_anywhere() {
  let server = MockServer::start().await;
  mount_boards(&server, vec![board(1, "Scrum A")]).await;
  mount_active_sprints(&server, 1, vec![]).await;

  let err = collect_sprint_data(&client(&server), "YOSHI", None).await.unwrap_err();
  assert!(matches!(err, BotError::NoActiveSprint), "{err}");
}

#[tokio::test]
async fn project_without_boards() {
  let server = MockServer::start().await;
  mount_boards(&server, vec![]).await;

  let err = collect_sprint_data(&client(&server), "YOSHI", None).await.unwrap_err();
  assert_eq!(err.to_string(), "I couldn't find that project's board");
}

#[tokio::test]
async fn unknown_sprint_id() {
  let server = MockServer::start().await;
  mount_boards(&server, vec![board(7, "YOSHI board")]).await;

  let err = collect_sprint_data(&client(&server), "YOSHI", Some(555)).await.unwrap_err();
  assert!(matches!(err, BotError::SprintNotFound), "{err}");
}

#[tokio::test]
async fn sprint_name_without_number() {
  let server = MockServer::start().await;
  mount_boards(&server, vec![board(1, "Scrum A")]).await;
  mount_active_sprints(&server, 1, vec![sprint(10, "Hardening week", 1)]).await;

  let err = collect_sprint_data(&client(&server), "YOSHI", None).await.unwrap_err();
  assert!(matches!(err, BotError::SprintNumber { .. }), "{err}");
}

#[tokio::test]
async fn missing_sprint_report() {
  let server = MockServer::start().await;
  mount_boards(&server, vec![board(1, "Scrum A")]).await;
  mount_active_sprints(&server, 1, vec![sprint(10, "Sprint 10", 1)]).await;

  let err = collect_sprint_data(&client(&server), "YOSHI", None).await.unwrap_err();
  assert!(matches!(err, BotError::ReportNotFound), "{err}");
}

#[tokio::test]
async fn report_text_has_link_and_summary() {
  let server = MockServer::start().await;
  mount_boards(&server, vec![board(1, "Scrum A")]).await;
  mount_active_sprints(&server, 1, vec![sprint(10, "Sprint 10", 1)]).await;
  mount_report(&server, 1, 10).await;

  let state = AppState::new(config(&server)).unwrap();
  let request = ReportRequest::parse("YOSHI").unwrap();
  let text = build_report(&state, &request).await.unwrap();

  assert!(text.starts_with(
    "Here you go!\nhttps://forms.example/viewform?entry.1082637073=Yoshi%20Web&entry.1975251686=10&"
  ));
  assert!(text.contains("\nPredictability 80.0\n"));
  assert!(text.ends_with("Bugs 1"));
}

fn slash(token: &str, text: &str, server: &MockServer) -> SlashCommand {
  SlashCommand {
    token: token.into(),
    team_id: "T123".into(),
    text: text.into(),
    response_url: format!("{}/slack/response", server.uri()),
  }
}

#[tokio::test]
async fn handler_rejects_bad_token() {
  let server = MockServer::start().await;
  let state = Arc::new(AppState::new(config(&server)).unwrap());

  let result = sprint_report_url(State(state), Form(slash("forged", "YOSHI", &server))).await;
  assert_eq!(result.unwrap_err(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn handler_answers_help_inline() {
  let server = MockServer::start().await;
  let state = Arc::new(AppState::new(config(&server)).unwrap());

  let reply = sprint_report_url(State(state), Form(slash("vtoken", "help", &server)))
    .await
    .unwrap();
  assert_eq!(reply.0, SlashResponse::in_channel(HELP_TEXT));
}

#[tokio::test]
async fn handler_reports_usage_for_bad_arguments() {
  let server = MockServer::start().await;
  let state = Arc::new(AppState::new(config(&server)).unwrap());

  let reply = sprint_report_url(State(state), Form(slash("vtoken", "YOSHI soon", &server)))
    .await
    .unwrap();
  assert!(reply.0.text.contains("sprint id must be a number"));
  assert_eq!(reply.0.response_type, ResponseType::Ephemeral);
}

#[tokio::test]
async fn handler_replies_then_posts_report() {
  let server = MockServer::start().await;
  mount_boards(&server, vec![board(1, "Scrum A")]).await;
  mount_active_sprints(&server, 1, vec![sprint(10, "Sprint 10", 1)]).await;
  mount_report(&server, 1, 10).await;
  Mock::given(method("POST"))
    .and(path("/slack/response"))
    .respond_with(ResponseTemplate::new(200))
    .mount(&server)
    .await;

  let state = Arc::new(AppState::new(config(&server)).unwrap());
  let reply = sprint_report_url(State(state), Form(slash("vtoken", "YOSHI", &server)))
    .await
    .unwrap();
  assert_eq!(reply.0.text, THINKING_TEXT);

  let posted = wait_for_slack_post(&server).await;
  assert_eq!(posted["response_type"], "in_channel");
  assert!(posted["text"].as_str().unwrap().starts_with("Here you go!\n"));
}

#[tokio::test]
async fn failed_report_posts_the_error() {
  let server = MockServer::start().await;
  mount_boards(&server, vec![]).await;
  Mock::given(method("POST"))
    .and(path("/slack/response"))
    .respond_with(ResponseTemplate::new(200))
    .mount(&server)
    .await;

  let state = Arc::new(AppState::new(config(&server)).unwrap());
  let _ = sprint_report_url(State(state), Form(slash("vtoken", "YOSHI", &server)))
    .await
    .unwrap();

  let posted = wait_for_slack_post(&server).await;
  assert_eq!(posted["text"], "I couldn't find that project's board");
}

#[tokio::test]
async fn stalled_response_url_does_not_hang_the_task() {
  let server = MockServer::start().await;
  mount_boards(&server, vec![]).await;
  Mock::given(method("POST"))
    .and(path("/slack/response"))
    .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
    .mount(&server)
    .await;

  let state = Arc::new(AppState::with_notify_timeout(config(&server), Duration::from_millis(200)).unwrap());
  let request = ReportRequest::parse("YOSHI").unwrap();
  let task = run_report_task(state, format!("{}/slack/response", server.uri()), request);

  tokio::time::timeout(Duration::from_secs(3), task)
    .await
    .expect("report task should give up on a stalled response_url");
}

async fn wait_for_slack_post(server: &MockServer) -> serde_json::Value {
  for _ in 0..100 {
    let requests = server.received_requests().await.unwrap_or_default();
    if let Some(req) = requests.iter().find(|r| r.url.path() == "/slack/response") {
      return serde_json::from_slice(&req.body).unwrap();
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
  }
  panic!("no post to response_url within 2s");
}
