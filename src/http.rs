//! Transport primitives for WeChat API calls.
//!
//! The module exposes [`ApiHttpClient`] alongside the structured [`ApiRequest`] and
//! [`ApiResponse`] values it exchanges, so tests and downstream crates can substitute their own
//! transport without touching the credential manager or the API operations. Every response is
//! funneled through [`ApiResponse::decode`], which applies the platform's `errcode`/`errmsg`
//! envelope convention uniformly.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	Body,
	multipart::{Form, Part},
};
// self
use crate::{_prelude::*, error::TransportError, obs::OperationKind};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing WeChat API requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared (behind
/// `Arc`) by the credential manager and the client, and the futures they return must be `Send`
/// so dispatchers can run invocations on a multi-threaded runtime. A transport only moves bytes:
/// it must not interpret `errcode` envelopes or retry.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Issues exactly one HTTP request and returns the raw status + body.
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_>;
}

/// HTTP methods used by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
	/// `GET` with query parameters only.
	Get,
	/// `POST` with a JSON or multipart body.
	Post,
}

/// Structured outbound request.
#[derive(Clone)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Fully-resolved URL, query parameters included.
	pub url: Url,
	/// Request payload.
	pub body: RequestBody,
}
impl ApiRequest {
	/// Creates a `GET` request without a body.
	pub fn get(url: Url) -> Self {
		Self { method: Method::Get, url, body: RequestBody::Empty }
	}

	/// Creates a `POST` request carrying a JSON document.
	pub fn post_json(url: Url, body: Value) -> Self {
		Self { method: Method::Post, url, body: RequestBody::Json(body) }
	}

	/// Creates a `POST` request carrying a multipart file upload.
	pub fn post_media(url: Url, media: MediaFile) -> Self {
		Self { method: Method::Post, url, body: RequestBody::Media(media) }
	}

	/// Appends a query parameter.
	pub fn query(mut self, key: &str, value: &str) -> Self {
		self.url.query_pairs_mut().append_pair(key, value);

		self
	}

	/// Returns the first value of the named query parameter.
	pub fn query_value(&self, key: &str) -> Option<String> {
		self.url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
	}
}
impl Debug for ApiRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		// Query strings carry `access_token` and `secret`.
		f.debug_struct("ApiRequest")
			.field("method", &self.method)
			.field("path", &self.url.path())
			.field("body", &self.body)
			.finish()
	}
}

/// Outbound request payload.
#[derive(Clone, Debug)]
pub enum RequestBody {
	/// No body.
	Empty,
	/// JSON document.
	Json(Value),
	/// Multipart upload of a single file.
	Media(MediaFile),
}

/// Local file queued for a multipart upload.
///
/// Only metadata is captured up front; the transport streams the content when the request is
/// sent, and the handle is released with the request body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaFile {
	/// Multipart field name.
	pub field: &'static str,
	/// Absolute path of the file.
	pub path: PathBuf,
	/// File name announced in the part's `Content-Disposition`.
	pub file_name: String,
	/// Content type announced for the part.
	pub content_type: &'static str,
	/// File size in bytes.
	pub len: u64,
}
impl MediaFile {
	/// Field name the platform expects for uploads.
	pub const FIELD: &'static str = "media";

	/// Validates that `path` is an absolute path to a regular file and captures its metadata.
	pub async fn inspect(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();

		if !path.is_absolute() {
			return Err(Error::invalid_argument(format!(
				"upload path `{}` must be absolute",
				path.display()
			)));
		}

		let metadata = tokio::fs::metadata(path)
			.await
			.map_err(|source| Error::File { path: path.to_owned(), source })?;

		if !metadata.is_file() {
			return Err(Error::invalid_argument(format!(
				"upload path `{}` is not a regular file",
				path.display()
			)));
		}

		let file_name = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_else(|| Self::FIELD.to_owned());

		Ok(Self {
			field: Self::FIELD,
			path: path.to_owned(),
			content_type: content_type_for(path),
			file_name,
			len: metadata.len(),
		})
	}

	#[cfg(feature = "reqwest")]
	async fn into_form(self) -> Result<Form, TransportError> {
		let file = tokio::fs::File::open(&self.path).await?;
		let part = Part::stream_with_length(Body::from(file), self.len)
			.file_name(self.file_name)
			.mime_str(self.content_type)?;

		Ok(Form::new().part(self.field, part))
	}
}

/// Raw response captured by a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Builds a response from a JSON document, mainly for test transports.
	pub fn json(status: u16, body: &Value) -> Self {
		Self { status, body: body.to_string().into_bytes() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Applies the platform's error envelope and decodes the payload.
	///
	/// A non-zero `errcode` wins over everything else and becomes [`Error::Authentication`] for
	/// token exchanges or [`Error::Remote`] for API operations. Without an envelope, non-2xx
	/// statuses become [`TransportError::Status`].
	pub fn decode<T>(&self, operation: OperationKind) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let envelope = match self.parse::<Envelope>() {
			Ok(envelope) => envelope,
			Err(_) if !self.is_success() =>
				return Err(TransportError::Status { status: self.status }.into()),
			Err(e) => return Err(e.into()),
		};

		if let Some(code) = envelope.errcode.filter(|code| *code != 0) {
			let message = envelope.errmsg.unwrap_or_default();

			return Err(match operation {
				OperationKind::Token => Error::Authentication { code, message },
				operation => Error::Remote { operation, code, message },
			});
		}
		if !self.is_success() {
			return Err(TransportError::Status { status: self.status }.into());
		}

		Ok(self.parse()?)
	}

	fn parse<T>(&self) -> Result<T, TransportError>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| TransportError::ResponseParse { source, status: self.status })
	}
}

#[derive(Deserialize)]
struct Envelope {
	#[serde(default)]
	errcode: Option<i64>,
	#[serde(default)]
	errmsg: Option<String>,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let ApiRequest { method, url, body } = request;
			let builder = match method {
				Method::Get => client.get(url),
				Method::Post => client.post(url),
			};
			let builder = match body {
				RequestBody::Empty => builder,
				RequestBody::Json(value) => builder.json(&value),
				RequestBody::Media(media) => builder.multipart(media.into_form().await?),
			};
			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}

fn content_type_for(path: &Path) -> &'static str {
	let extension = path
		.extension()
		.map(|ext| ext.to_string_lossy().to_ascii_lowercase())
		.unwrap_or_default();

	match extension.as_str() {
		"jpg" | "jpeg" => "image/jpeg",
		"png" => "image/png",
		"gif" => "image/gif",
		"bmp" => "image/bmp",
		"webp" => "image/webp",
		_ => "application/octet-stream",
	}
}
