// crates.io
use httpmock::prelude::*;
// self
use kypo_client::{
	_preludet::*,
	Client,
	auth::{Session, TokenSecret},
};

const TOKEN_PATH: &str = "/keycloak/realms/KYPO/protocol/openid-connect/token";
const DEFINITION_PATH: &str = "/kypo-sandbox-service/api/v1/definitions/5";

fn definition_body() -> String {
	serde_json::json!({
		"id": 5,
		"url": "https://gitlab.example/kypo/junior-hacker.git",
		"name": "junior-hacker",
		"rev": "master",
		"created_by": {
			"id": 1,
			"sub": "kypo-admin",
			"full_name": "KYPO Admin",
			"given_name": "KYPO",
			"family_name": "Admin",
			"mail": "admin@kypo.example"
		}
	})
	.to_string()
}

fn expiring_session(token: &str) -> Session {
	Session::issued(
		TokenSecret::new(token),
		OffsetDateTime::now_utc() - Duration::seconds(295),
		Duration::seconds(300),
	)
}

#[tokio::test]
async fn expiring_session_is_renewed_before_the_request() {
	let server = MockServer::start_async().await;
	let client = test_client(password_test_config(&server.base_url()));

	client.set_session(expiring_session("old-token"));

	let grant = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).body(r#"{"access_token":"new-token","expires_in":300}"#);
		})
		.await;
	let api = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(DEFINITION_PATH)
				.header("authorization", "Bearer new-token")
				.header("content-type", "application/json");
			then.status(200).body(definition_body());
		})
		.await;
	let definition =
		client.get_sandbox_definition(5).await.expect("Definition fetch should succeed.");

	grant.assert_async().await;
	api.assert_async().await;

	assert_eq!(definition.name, "junior-hacker");
	assert_eq!(client.current_token().expose(), "new-token");
	assert_eq!(client.refresh_metrics.attempts(), 1);
}

#[tokio::test]
async fn fresh_session_is_used_without_renewal() {
	let server = MockServer::start_async().await;
	let client = test_client(password_test_config(&server.base_url()));

	client.set_session(Session::issued(
		TokenSecret::new("fresh-token"),
		OffsetDateTime::now_utc(),
		Duration::hours(1),
	));

	let grant = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).body(r#"{"access_token":"unused","expires_in":300}"#);
		})
		.await;
	let api = server
		.mock_async(|when, then| {
			when.method(GET).path(DEFINITION_PATH).header("authorization", "Bearer fresh-token");
			then.status(200).body(definition_body());
		})
		.await;

	client.get_sandbox_definition(5).await.expect("Definition fetch should succeed.");

	api.assert_async().await;
	grant.assert_calls_async(0).await;
}

#[tokio::test]
async fn concurrent_requests_share_one_renewal() {
	let server = MockServer::start_async().await;
	let client = test_client(password_test_config(&server.base_url()));

	client.set_session(expiring_session("old-token"));

	let grant = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.delay(StdDuration::from_millis(150))
				.body(r#"{"access_token":"shared-token","expires_in":300}"#);
		})
		.await;
	let api = server
		.mock_async(|when, then| {
			when.method(GET).path(DEFINITION_PATH).header("authorization", "Bearer shared-token");
			then.status(200).body(definition_body());
		})
		.await;
	let handles = (0..5)
		.map(|_| {
			let client = client.clone();

			tokio::spawn(async move { client.get_sandbox_definition(5).await })
		})
		.collect::<Vec<_>>();

	for handle in handles {
		handle
			.await
			.expect("Request task should not panic.")
			.expect("Definition fetch should succeed.");
	}

	grant.assert_calls_async(1).await;
	api.assert_calls_async(5).await;

	assert_eq!(client.refresh_metrics.attempts(), 1);
}

#[tokio::test]
async fn rejected_token_triggers_one_login_and_retry() {
	let server = MockServer::start_async().await;
	let client = test_client(password_test_config(&server.base_url()));

	client.set_session(Session::new(TokenSecret::new("stale-token")));

	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path(DEFINITION_PATH).header("authorization", "Bearer stale-token");
			then.status(401);
		})
		.await;
	let grant = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).body(r#"{"access_token":"renewed-token","expires_in":300}"#);
		})
		.await;
	let accepted = server
		.mock_async(|when, then| {
			when.method(GET).path(DEFINITION_PATH).header("authorization", "Bearer renewed-token");
			then.status(200).body(definition_body());
		})
		.await;

	client.get_sandbox_definition(5).await.expect("Retried fetch should succeed.");

	rejected.assert_async().await;
	grant.assert_async().await;
	accepted.assert_async().await;
}

#[tokio::test]
async fn repeated_rejection_is_not_retried_again() {
	let server = MockServer::start_async().await;
	let client = test_client(password_test_config(&server.base_url()));

	client.set_session(Session::new(TokenSecret::new("stale-token")));

	let api = server
		.mock_async(|when, then| {
			when.method(GET).path(DEFINITION_PATH);
			then.status(401).body("denied");
		})
		.await;
	let grant = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).body(r#"{"access_token":"renewed-token","expires_in":300}"#);
		})
		.await;
	let err = client.get_sandbox_definition(5).await.expect_err("Second 401 must surface.");

	assert!(matches!(err, Error::UnexpectedStatus { status: 401, .. }));

	api.assert_calls_async(2).await;
	grant.assert_calls_async(1).await;
}

#[tokio::test]
async fn static_token_rejection_is_surfaced() {
	let server = MockServer::start_async().await;
	let client = Client::connect(token_test_config(&server.base_url(), "static-token"))
		.await
		.expect("Static token clients connect offline.");
	let api = server
		.mock_async(|when, then| {
			when.method(GET).path(DEFINITION_PATH).header("authorization", "Bearer static-token");
			then.status(401);
		})
		.await;
	let err = client.get_sandbox_definition(5).await.expect_err("401 must surface.");

	api.assert_async().await;

	assert!(matches!(
		err,
		Error::UnexpectedStatus { operation: "get_sandbox_definition", status: 401, .. }
	));
}

#[tokio::test]
async fn empty_session_logs_in_on_first_request() {
	let server = MockServer::start_async().await;
	let client = test_client(password_test_config(&server.base_url()));
	let grant = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).body(r#"{"access_token":"first-token","expires_in":300}"#);
		})
		.await;
	let api = server
		.mock_async(|when, then| {
			when.method(GET).path(DEFINITION_PATH).header("authorization", "Bearer first-token");
			then.status(200).body(definition_body());
		})
		.await;

	client.get_sandbox_definition(5).await.expect("Definition fetch should succeed.");

	grant.assert_async().await;
	api.assert_async().await;
}
