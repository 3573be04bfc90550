//! Account configuration: the single app identity the client acts for and the endpoint set
//! derived from the API base URL.

/// Builder API for assembling account configurations.
pub mod builder;

pub use builder::*;

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, credential::TokenSecret};

/// Production API base shared by every WeChat Official Account endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.weixin.qq.com/cgi-bin/";

const APP_ID_MAX_LEN: usize = 64;

/// Error returned when app id validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("App id cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("App id contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("App id exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Validated Official Account app id (`appid`).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppId(String);
impl AppId {
	/// Creates a new app id after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_app_id(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for AppId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for AppId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<AppId> for String {
	fn from(value: AppId) -> Self {
		value.0
	}
}
impl TryFrom<String> for AppId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_app_id(&value)?;

		Ok(Self(value))
	}
}
impl Debug for AppId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "AppId({})", self.0)
	}
}
impl Display for AppId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for AppId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

/// Endpoint set resolved against the API base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
	/// `GET token` client-credential exchange.
	pub token: Url,
	/// `POST media/uploadimg` inline article images.
	pub upload_image: Url,
	/// `POST material/add_material` permanent materials.
	pub add_material: Url,
	/// `POST draft/add` draft creation.
	pub add_draft: Url,
	/// `POST freepublish/submit` draft publishing.
	pub submit_publish: Url,
	/// `POST draft/delete` draft deletion.
	pub delete_draft: Url,
}
impl Endpoints {
	/// Resolves every endpoint relative to `base`, which must end with a slash.
	pub(crate) fn resolve(base: &Url) -> Result<Self, url::ParseError> {
		Ok(Self {
			token: base.join("token")?,
			upload_image: base.join("media/uploadimg")?,
			add_material: base.join("material/add_material")?,
			add_draft: base.join("draft/add")?,
			submit_publish: base.join("freepublish/submit")?,
			delete_draft: base.join("draft/delete")?,
		})
	}
}

/// Immutable account configuration consumed by the credential manager and client.
#[derive(Clone)]
pub struct AccountConfig {
	/// Official Account app id.
	pub app_id: AppId,
	/// App secret paired with [`AccountConfig::app_id`].
	pub app_secret: TokenSecret,
	/// API base every endpoint hangs off.
	pub api_base: Url,
	/// Resolved endpoints.
	pub endpoints: Endpoints,
}
impl AccountConfig {
	/// Creates a new builder for the provided credential pair.
	pub fn builder(
		app_id: impl Into<String>,
		app_secret: impl Into<String>,
	) -> AccountConfigBuilder {
		AccountConfigBuilder::new(app_id, app_secret)
	}
}
impl Debug for AccountConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccountConfig")
			.field("app_id", &self.app_id)
			.field("app_secret", &self.app_secret)
			.field("api_base", &self.api_base.as_str())
			.finish()
	}
}

fn validate_app_id(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}
	if view.len() > APP_ID_MAX_LEN {
		return Err(IdentifierError::TooLong { max: APP_ID_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn app_ids_validate() {
		assert_eq!(AppId::new(""), Err(IdentifierError::Empty));
		assert_eq!(AppId::new("wx 123"), Err(IdentifierError::ContainsWhitespace));
		assert!(AppId::new("a".repeat(APP_ID_MAX_LEN + 1)).is_err());

		let app_id = AppId::new("wx1234567890abcdef").expect("App id fixture should be valid.");

		assert_eq!(app_id.as_ref(), "wx1234567890abcdef");
		assert!(serde_json::from_str::<AppId>("\"with space\"").is_err());
	}

	#[test]
	fn endpoints_resolve_under_base_path() {
		let base = Url::parse(DEFAULT_API_BASE).expect("Default API base should parse.");
		let endpoints = Endpoints::resolve(&base).expect("Endpoints should resolve.");

		assert_eq!(endpoints.token.as_str(), "https://api.weixin.qq.com/cgi-bin/token");
		assert_eq!(
			endpoints.add_material.as_str(),
			"https://api.weixin.qq.com/cgi-bin/material/add_material"
		);
		assert_eq!(
			endpoints.submit_publish.as_str(),
			"https://api.weixin.qq.com/cgi-bin/freepublish/submit"
		);
		assert_eq!(
			endpoints.delete_draft.as_str(),
			"https://api.weixin.qq.com/cgi-bin/draft/delete"
		);
	}
}
