//! Immutable credential record and its freshness rules.

// self
use crate::{_prelude::*, credential::TokenSecret};

/// Access token plus the instant it stops being accepted by the platform.
///
/// Records are never mutated in place; a refresh produces a new record that replaces the cached
/// one wholesale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// Bearer token sent as the `access_token` query parameter.
	pub token: TokenSecret,
	/// Instant the token was obtained.
	pub issued_at: OffsetDateTime,
	/// Instant the platform stops accepting the token.
	pub expires_at: OffsetDateTime,
}
impl Credential {
	/// Tokens closer than this to expiry are refreshed before use.
	pub const REFRESH_WINDOW: Duration = Duration::minutes(5);

	/// Builds a record from an issued-at instant and the lifetime reported by the platform.
	///
	/// Returns `None` when the expiry falls outside the representable date range.
	pub fn issued(
		token: TokenSecret,
		issued_at: OffsetDateTime,
		lifetime: Duration,
	) -> Option<Self> {
		let expires_at = issued_at.checked_add(lifetime)?;

		Some(Self { token, issued_at, expires_at })
	}

	/// Returns `true` if the token may no longer be handed out at `now`.
	///
	/// A token expiring exactly [`Self::REFRESH_WINDOW`] after `now` already needs a refresh.
	pub fn needs_refresh_at(&self, now: OffsetDateTime) -> bool {
		self.expires_at <= now.saturating_add(Self::REFRESH_WINDOW)
	}
}
