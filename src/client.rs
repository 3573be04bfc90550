//! Authenticated API operations built on the credential manager.
//!
//! Every operation has the same shape: validate local input, obtain a token, issue exactly one
//! remote call, and translate the `errcode`/`errmsg` envelope into an [`Error`]. Nothing is
//! retried; callers decide whether a failed call is worth repeating.

pub mod draft;
pub mod media;

pub use draft::*;
pub use media::*;

// self
use crate::{
	_prelude::*,
	account::AccountConfig,
	credential::{CredentialManager, TOKEN_REJECTED_CODES},
	http::{ApiHttpClient, ApiRequest},
	obs::{self, OperationKind, event},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// WeChat Official Account API client for a single account.
///
/// The client shares its transport with the [`CredentialManager`] it owns, so one connection
/// pool serves both token exchanges and API calls.
pub struct MpClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP client used for every outbound API request.
	pub http_client: Arc<C>,
	/// Token cache consulted before each operation.
	pub credentials: Arc<CredentialManager<C>>,
}
impl<C> MpClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(account: AccountConfig, http_client: impl Into<Arc<C>>) -> Self {
		let http_client = http_client.into();
		let credentials = Arc::new(CredentialManager::new(account, http_client.clone()));

		Self { http_client, credentials }
	}

	/// Account the client acts for.
	pub fn account(&self) -> &AccountConfig {
		self.credentials.account()
	}

	/// Runs one authenticated call: token, request, envelope translation.
	///
	/// The token is appended to `request` as the `access_token` query parameter.
	pub(crate) async fn call<T>(&self, operation: OperationKind, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let token = self.credentials.access_token().await?;
		let request = request.query("access_token", token.expose());
		let response = self.http_client.execute(request).await?;
		let result = response.decode(operation);

		if matches!(&result, Err(Error::Remote { code, .. }) if TOKEN_REJECTED_CODES.contains(code))
		{
			event!(warn, operation = operation.as_str(), "Access token rejected; dropping cache.");
			self.credentials.invalidate_if(&token);
		}

		result
	}

	/// Wraps [`Self::call`] in the operation's span and outcome counters.
	pub(crate) async fn observed_call<T>(
		&self,
		operation: OperationKind,
		request: ApiRequest,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		obs::observe(operation, "call", self.call(operation, request)).await
	}
}
#[cfg(feature = "reqwest")]
impl MpClient<ReqwestHttpClient> {
	/// Creates a new client with its own reqwest-backed transport.
	pub fn new(account: AccountConfig) -> Self {
		Self::with_http_client(account, ReqwestHttpClient::default())
	}
}
impl<C> Clone for MpClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), credentials: self.credentials.clone() }
	}
}
impl<C> Debug for MpClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MpClient").field("credentials", &self.credentials).finish()
	}
}

/// Payload of operations whose success response carries nothing but `errcode: 0`.
#[derive(Debug, Deserialize)]
pub(crate) struct Acknowledged {}
