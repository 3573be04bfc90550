//! WeChat Official Account publishing tools over MCP.
//!
//! A credential-cached API client for image uploads, draft creation, publishing, and deletion,
//! plus the stdio dispatcher that exposes them as tools.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod account;
pub mod client;
pub mod credential;
pub mod error;
pub mod http;
pub mod mcp;
pub mod obs;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::{collections::HashMap, fs, process};
	// self
	use crate::{
		account::AccountConfig,
		client::MpClient,
		http::{ApiHttpClient, ApiRequest, ApiResponse, HttpFuture, ReqwestHttpClient},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = MpClient<ReqwestHttpClient>;

	/// In-process transport double answering by URL path and recording every request.
	///
	/// Each response yields to the scheduler once before resolving, so concurrently polled
	/// operations interleave the way they would against a real network.
	#[derive(Debug, Default)]
	pub struct ScriptedHttpClient {
		routes: Mutex<HashMap<String, Value>>,
		requests: Mutex<Vec<ApiRequest>>,
	}
	impl ScriptedHttpClient {
		/// Answers requests for `path` with `body` (HTTP 200).
		pub fn route(self, path: &str, body: Value) -> Self {
			self.routes.lock().insert(path.to_owned(), body);

			self
		}

		/// Every request seen so far, in order.
		pub fn requests(&self) -> Vec<ApiRequest> {
			self.requests.lock().clone()
		}

		/// Number of requests sent to `path`.
		pub fn calls_to(&self, path: &str) -> usize {
			self.requests.lock().iter().filter(|request| request.url.path() == path).count()
		}
	}
	impl ApiHttpClient for ScriptedHttpClient {
		fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
			let body = self.routes.lock().get(request.url.path()).cloned();

			self.requests.lock().push(request);

			Box::pin(async move {
				tokio::task::yield_now().await;

				Ok(match body {
					Some(body) => ApiResponse::json(200, &body),
					None => ApiResponse { status: 404, body: b"not found".to_vec() },
				})
			})
		}
	}

	/// Builds an [`MpClient`] over a [`ScriptedHttpClient`] rooted at `https://mp.test/cgi-bin/`.
	pub fn build_scripted_client(
		transport: Arc<ScriptedHttpClient>,
	) -> MpClient<ScriptedHttpClient> {
		MpClient::with_http_client(
			test_account("https://mp.test/cgi-bin/", "wx-test-app", "wx-test-secret"),
			transport,
		)
	}

	/// Temporary image file removed on drop.
	#[derive(Debug)]
	pub struct TempImage(PathBuf);
	impl TempImage {
		/// Writes a small PNG-looking file into the system temp dir.
		pub fn png(label: &str) -> Self {
			let unique = format!(
				"wechat_mp_mcp_{label}_{}_{}.png",
				process::id(),
				OffsetDateTime::now_utc().unix_timestamp_nanos(),
			);
			let path = std::env::temp_dir().join(unique);

			fs::write(&path, b"\x89PNG\r\n\x1a\nfixture")
				.unwrap_or_else(|e| panic!("Failed to write temp image {}: {e}", path.display()));

			Self(path)
		}

		/// Absolute path of the file.
		pub fn path(&self) -> &Path {
			&self.0
		}
	}
	impl Drop for TempImage {
		fn drop(&mut self) {
			let _ = fs::remove_file(&self.0);
		}
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds an account configuration pointing every endpoint at `api_base`.
	pub fn test_account(api_base: &str, app_id: &str, app_secret: &str) -> AccountConfig {
		AccountConfig::builder(app_id, app_secret)
			.api_base(Url::parse(api_base).expect("Failed to parse mock API base URL."))
			.build()
			.expect("Failed to build test account configuration.")
	}

	/// Constructs an [`MpClient`] backed by the reqwest transport used across integration tests.
	pub fn build_reqwest_test_client(
		api_base: &str,
		app_id: &str,
		app_secret: &str,
	) -> ReqwestTestClient {
		MpClient::with_http_client(
			test_account(api_base, app_id, app_secret),
			test_reqwest_http_client(),
		)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::{Value, json};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(feature = "server")]
use {clap as _, color_eyre as _, dotenvy as _, tracing_subscriber as _};
#[cfg(test)] use {httpmock as _, wechat_mp_mcp as _};
