// crates.io
use httpmock::prelude::*;
// self
use kypo_client::{_preludet::*, training::TrainingFlavor};

const EXPORT: &str = r#"{"title":"Junior Hacker","levels":[]}"#;

#[tokio::test]
async fn linear_definitions_export_import_and_delete() {
	let server = MockServer::start_async().await;
	let client = test_client(token_test_config(&server.base_url(), "training-token"));
	let export = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/kypo-rest-training/api/v1/exports/training-definitions/8")
				.header("accept", "application/octet-stream")
				.header("authorization", "Bearer training-token");
			then.status(200).body(EXPORT);
		})
		.await;
	let import = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/kypo-rest-training/api/v1/imports/training-definitions")
				.header("content-type", "application/json")
				.body(EXPORT);
			then.status(200).body(r#"{"id":9,"title":"Junior Hacker"}"#);
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/kypo-rest-training/api/v1/training-definitions/9");
			then.status(404);
		})
		.await;
	let exported = client
		.get_training_definition(TrainingFlavor::Linear, 8)
		.await
		.expect("Export should succeed.");

	assert_eq!(exported.id, 8);
	assert_eq!(exported.content, EXPORT);

	let imported = client
		.create_training_definition(TrainingFlavor::Linear, exported.content)
		.await
		.expect("Import should succeed.");

	assert_eq!(imported.id, 9);
	assert_eq!(imported.content, EXPORT);

	client
		.delete_training_definition(TrainingFlavor::Linear, 9)
		.await
		.expect("Deleting a missing definition should succeed.");

	export.assert_async().await;
	import.assert_async().await;
	delete.assert_async().await;
}

#[tokio::test]
async fn adaptive_definitions_use_their_own_service() {
	let server = MockServer::start_async().await;
	let client = test_client(token_test_config(&server.base_url(), "training-token"));
	let export = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/kypo-adaptive-training/api/v1/exports/training-definitions/4");
			then.status(404);
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/kypo-adaptive-training/api/v1/training-definitions/4");
			then.status(500).body("locked");
		})
		.await;
	let err = client
		.get_training_definition(TrainingFlavor::Adaptive, 4)
		.await
		.expect_err("Missing export must fail.");

	assert!(matches!(
		err,
		Error::NotFound { resource: "training definition adaptive", ref identifier } if identifier == "4"
	));

	let err = client
		.delete_training_definition(TrainingFlavor::Adaptive, 4)
		.await
		.expect_err("Server errors must surface.");

	assert!(matches!(
		err,
		Error::UnexpectedStatus { operation: "delete_training_definition", status: 500, .. }
	));

	export.assert_async().await;
	delete.assert_async().await;
}
