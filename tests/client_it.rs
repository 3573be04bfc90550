// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use wechat_mp_mcp::{
	_preludet::*,
	client::{Article, Material},
	obs::OperationKind,
};

const APP_ID: &str = "wx-client-app";
const APP_SECRET: &str = "wx-client-secret";

async fn server_with_token() -> MockServer {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"T1\",\"expires_in\":7200}");
		})
		.await;

	server
}

#[tokio::test]
async fn uploads_return_distinct_shapes() {
	let server = server_with_token().await;
	let client = build_reqwest_test_client(&server.url("/cgi-bin/"), APP_ID, APP_SECRET);
	let image = TempImage::png("uploads");
	let inline = server
		.mock_async(|when, then| {
			when.method(POST).path("/cgi-bin/media/uploadimg").query_param("access_token", "T1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"url\":\"http://mmbiz.qpic.cn/inline.png\"}");
		})
		.await;
	let material = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/cgi-bin/material/add_material")
				.query_param("access_token", "T1")
				.query_param("type", "image");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"media_id\":\"M1\",\"url\":\"http://mmbiz.qpic.cn/cover.png\"}");
		})
		.await;
	let url = client
		.upload_article_image(image.path())
		.await
		.expect("Inline image upload should succeed.");
	let uploaded =
		client.upload_material(image.path()).await.expect("Material upload should succeed.");

	assert_eq!(url, "http://mmbiz.qpic.cn/inline.png");
	assert_eq!(
		uploaded,
		Material { media_id: "M1".into(), url: "http://mmbiz.qpic.cn/cover.png".into() }
	);

	inline.assert_async().await;
	material.assert_async().await;
}

#[tokio::test]
async fn upload_errcode_is_reported_with_action() {
	let server = server_with_token().await;
	let client = build_reqwest_test_client(&server.url("/cgi-bin/"), APP_ID, APP_SECRET);
	let image = TempImage::png("upload_error");

	server
		.mock_async(|when, then| {
			when.method(POST).path("/cgi-bin/material/add_material");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":40005,\"errmsg\":\"invalid file type\"}");
		})
		.await;

	let err = client
		.upload_material(image.path())
		.await
		.expect_err("Remote upload errors should surface.");

	assert_eq!(err.to_string(), "Failed to upload material: invalid file type (errcode 40005).");
	assert!(matches!(err, Error::Remote { operation: OperationKind::UploadMaterial, .. }));
}

#[tokio::test]
async fn missing_upload_file_fails_before_any_request() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.url("/cgi-bin/"), APP_ID, APP_SECRET);
	let token = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token");
			then.status(200).body("{\"access_token\":\"T1\",\"expires_in\":7200}");
		})
		.await;
	let missing = std::env::temp_dir().join("wechat_mp_mcp_never_written.png");
	let err = client
		.upload_article_image(&missing)
		.await
		.expect_err("Missing files should be rejected.");

	assert!(matches!(err, Error::File { .. }));

	token.assert_calls_async(0).await;
}

#[tokio::test]
async fn draft_lifecycle_sends_expected_payloads() {
	let server = server_with_token().await;
	let client = build_reqwest_test_client(&server.url("/cgi-bin/"), APP_ID, APP_SECRET);
	let add = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/cgi-bin/draft/add")
				.query_param("access_token", "T1")
				.json_body(json!({
					"articles": [{
						"title": "Launch notes",
						"content": "<p>Hello</p>",
						"thumb_media_id": "M1",
						"digest": "Short summary",
					}],
				}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"media_id\":\"D1\"}");
		})
		.await;
	let publish = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/cgi-bin/freepublish/submit")
				.query_param("access_token", "T1")
				.json_body(json!({ "media_id": "D1" }));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":0,\"errmsg\":\"ok\",\"publish_id\":\"P1\"}");
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/cgi-bin/draft/delete")
				.query_param("access_token", "T1")
				.json_body(json!({ "media_id": "D1" }));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":0,\"errmsg\":\"ok\"}");
		})
		.await;
	let article = Article::new("Launch notes", "<p>Hello</p>", "M1").with_digest("Short summary");
	let draft_id = client.add_draft(&[article]).await.expect("Draft creation should succeed.");
	let publish_id = client.publish_draft(&draft_id).await.expect("Publishing should succeed.");

	client.delete_draft(&draft_id).await.expect("Deleting should succeed.");

	assert_eq!(draft_id, "D1");
	assert_eq!(publish_id, "P1");

	add.assert_calls_async(1).await;
	publish.assert_calls_async(1).await;
	delete.assert_calls_async(1).await;
}

#[tokio::test]
async fn publish_and_delete_propagate_remote_messages() {
	let server = server_with_token().await;
	let client = build_reqwest_test_client(&server.url("/cgi-bin/"), APP_ID, APP_SECRET);
	let publish = server
		.mock_async(|when, then| {
			when.method(POST).path("/cgi-bin/freepublish/submit");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":53503,\"errmsg\":\"draft not ready for publish\"}");
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(POST).path("/cgi-bin/draft/delete");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":40007,\"errmsg\":\"invalid media_id\"}");
		})
		.await;
	let err = client.publish_draft("D404").await.expect_err("Publish errors should surface.");

	assert!(err.to_string().contains("draft not ready for publish"));
	assert_eq!(err.remote_code(), Some(53503));

	let err = client.delete_draft("D404").await.expect_err("Delete errors should surface.");

	assert_eq!(err.to_string(), "Failed to delete draft: invalid media_id (errcode 40007).");

	publish.assert_calls_async(1).await;
	delete.assert_calls_async(1).await;
}

#[tokio::test]
async fn invalid_draft_input_never_reaches_the_network() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.url("/cgi-bin/"), APP_ID, APP_SECRET);
	let any = server
		.mock_async(|_when, then| {
			then.status(500);
		})
		.await;

	for article in [
		Article::new("", "<p>Body</p>", "M1"),
		Article::new("Title", "", "M1"),
		Article::new("Title", "<p>Body</p>", ""),
	] {
		let err = client.add_draft(&[article]).await.expect_err("Incomplete articles should fail.");

		assert!(matches!(err, Error::InvalidArgument { .. }));
	}

	let pair = [Article::new("A", "a", "M1"), Article::new("B", "b", "M1")];

	assert!(client.add_draft(&pair).await.is_err());
	assert!(client.add_draft(&[]).await.is_err());
	assert!(client.publish_draft(" ").await.is_err());
	assert!(client.delete_draft("").await.is_err());

	any.assert_calls_async(0).await;
}

#[tokio::test]
async fn rejected_token_is_dropped_from_cache() {
	let server = server_with_token().await;
	let client = build_reqwest_test_client(&server.url("/cgi-bin/"), APP_ID, APP_SECRET);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/cgi-bin/freepublish/submit");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":42001,\"errmsg\":\"access_token expired\"}");
		})
		.await;

	let err = client.publish_draft("D1").await.expect_err("Expired tokens should surface.");

	assert!(err.to_string().contains("access_token expired"));
	assert!(client.credentials.cached().is_none());
}

#[tokio::test]
async fn gateway_failures_are_transport_errors() {
	let server = server_with_token().await;
	let client = build_reqwest_test_client(&server.url("/cgi-bin/"), APP_ID, APP_SECRET);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/cgi-bin/draft/delete");
			then.status(502).body("<html>Bad Gateway</html>");
		})
		.await;

	let err = client.delete_draft("D1").await.expect_err("Gateway errors should surface.");

	assert!(err.to_string().contains("502"));
}
