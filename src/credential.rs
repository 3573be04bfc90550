//! Access-token caching for the configured account.
//!
//! [`CredentialManager`] owns the single cached [`Credential`] and hands out its token while it
//! remains valid for more than [`Credential::REFRESH_WINDOW`]. Otherwise it performs one
//! client-credential exchange against the `token` endpoint and replaces the cache wholesale.
//!
//! Refreshes are not serialized: two callers that both observe a missing or stale credential
//! each fetch a token, and the last writer wins. The lock only covers reading or swapping the
//! cached record and is never held across an `.await`.

pub mod record;
pub mod secret;

pub use record::*;
pub use secret::*;

// self
use crate::{
	_prelude::*,
	account::AccountConfig,
	error::TransportError,
	http::{ApiHttpClient, ApiRequest},
	obs::{self, OperationKind, event},
};

/// Remote error codes meaning the presented access token is no longer usable.
pub const TOKEN_REJECTED_CODES: [i64; 3] = [40001, 40014, 42001];

/// Obtains and caches the bearer token for one account.
pub struct CredentialManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	http_client: Arc<C>,
	account: AccountConfig,
	cache: Mutex<Option<Credential>>,
}
impl<C> CredentialManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a manager with an empty cache.
	pub fn new(account: AccountConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into(), account, cache: Mutex::new(None) }
	}

	/// Account this manager obtains tokens for.
	pub fn account(&self) -> &AccountConfig {
		&self.account
	}

	/// Returns a valid access token, fetching a new one when the cache is empty or stale.
	pub async fn access_token(&self) -> Result<TokenSecret> {
		self.access_token_at(OffsetDateTime::now_utc()).await
	}

	/// Same as [`Self::access_token`], evaluating freshness at `now`.
	pub async fn access_token_at(&self, now: OffsetDateTime) -> Result<TokenSecret> {
		let cached = self
			.cache
			.lock()
			.as_ref()
			.filter(|credential| !credential.needs_refresh_at(now))
			.map(|credential| credential.token.clone());

		if let Some(token) = cached {
			event!(debug, "Reusing cached access token.");

			return Ok(token);
		}

		let credential = self.fetch(now).await?;
		let token = credential.token.clone();

		event!(
			debug,
			expires_at = %credential.expires_at,
			"Cached a fresh access token."
		);
		*self.cache.lock() = Some(credential);

		Ok(token)
	}

	/// Returns a copy of the cached credential, if any.
	pub fn cached(&self) -> Option<Credential> {
		self.cache.lock().clone()
	}

	/// Installs `credential` wholesale, e.g. to reuse a token obtained elsewhere.
	pub fn replace_credential(&self, credential: Credential) {
		*self.cache.lock() = Some(credential);
	}

	/// Drops the cached credential so the next call fetches a new token.
	pub fn invalidate(&self) -> Option<Credential> {
		self.cache.lock().take()
	}

	/// Drops the cached credential only while it still holds `token`.
	///
	/// A caller whose token was rejected must not evict a newer credential installed meanwhile.
	pub fn invalidate_if(&self, token: &TokenSecret) -> Option<Credential> {
		let mut cache = self.cache.lock();

		if cache.as_ref().is_some_and(|credential| &credential.token == token) {
			cache.take()
		} else {
			None
		}
	}

	async fn fetch(&self, now: OffsetDateTime) -> Result<Credential> {
		obs::observe(OperationKind::Token, "fetch", async move {
			let request = ApiRequest::get(self.account.endpoints.token.clone())
				.query("grant_type", "client_credential")
				.query("appid", &self.account.app_id)
				.query("secret", self.account.app_secret.expose());
			let response = self.http_client.execute(request).await?;
			let grant: TokenGrant = response.decode(OperationKind::Token)?;

			let TokenGrant { access_token, expires_in } = grant;

			if expires_in <= 0 {
				return Err(TransportError::InvalidExpiresIn { expires_in }.into());
			}

			Credential::issued(access_token, now, Duration::seconds(expires_in))
				.ok_or_else(|| TransportError::InvalidExpiresIn { expires_in }.into())
		})
		.await
	}
}
impl<C> Debug for CredentialManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialManager")
			.field("account", &self.account)
			.field("cached", &self.cache.lock().is_some())
			.finish()
	}
}

#[derive(Deserialize)]
struct TokenGrant {
	access_token: TokenSecret,
	expires_in: i64,
}
