// self
use crate::{
	_prelude::*,
	account::{AccountConfig, AppId, DEFAULT_API_BASE, Endpoints},
	credential::TokenSecret,
	error::ConfigError,
};

/// Builder for [`AccountConfig`] values.
#[derive(Debug)]
pub struct AccountConfigBuilder {
	/// Raw app id awaiting validation.
	pub app_id: String,
	/// Raw app secret awaiting validation.
	pub app_secret: TokenSecret,
	/// Optional API base override (defaults to [`DEFAULT_API_BASE`]).
	pub api_base: Option<Url>,
}
impl AccountConfigBuilder {
	/// Creates a new builder seeded with the provided credential pair.
	pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
		Self { app_id: app_id.into(), app_secret: TokenSecret::new(app_secret), api_base: None }
	}

	/// Overrides the API base, e.g. to target a mock server or a proxy.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<AccountConfig, ConfigError> {
		let app_id = AppId::new(&self.app_id)?;

		if self.app_secret.expose().trim().is_empty() {
			return Err(ConfigError::MissingAppSecret);
		}

		let api_base = match self.api_base {
			Some(url) => url,
			None => Url::parse(DEFAULT_API_BASE)
				.map_err(|source| ConfigError::InvalidApiBase { source })?,
		};
		let api_base = normalize_base(api_base)?;
		let endpoints =
			Endpoints::resolve(&api_base).map_err(|source| ConfigError::InvalidApiBase { source })?;

		Ok(AccountConfig { app_id, app_secret: self.app_secret, api_base, endpoints })
	}
}

fn normalize_base(mut url: Url) -> Result<Url, ConfigError> {
	if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
		return Err(ConfigError::UnsupportedApiBase { url: url.to_string() });
	}

	url.set_query(None);
	url.set_fragment(None);

	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::account::IdentifierError;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse test URL.")
	}

	#[test]
	fn builder_rejects_missing_credentials() {
		let err = AccountConfig::builder("", "secret")
			.build()
			.expect_err("Empty app ids should be rejected.");

		assert!(matches!(err, ConfigError::InvalidAppId(IdentifierError::Empty)));

		let err = AccountConfig::builder("wx-app", "  ")
			.build()
			.expect_err("Blank app secrets should be rejected.");

		assert!(matches!(err, ConfigError::MissingAppSecret));
	}

	#[test]
	fn builder_defaults_to_production_base() {
		let config = AccountConfig::builder("wx-app", "secret")
			.build()
			.expect("Default configuration should build.");

		assert_eq!(config.api_base.as_str(), DEFAULT_API_BASE);
		assert_eq!(
			config.endpoints.add_draft.as_str(),
			"https://api.weixin.qq.com/cgi-bin/draft/add"
		);
	}

	#[test]
	fn builder_normalizes_base_without_trailing_slash() {
		let config = AccountConfig::builder("wx-app", "secret")
			.api_base(url("http://127.0.0.1:8080/cgi-bin?debug=1"))
			.build()
			.expect("Mock base should build.");

		assert_eq!(config.api_base.as_str(), "http://127.0.0.1:8080/cgi-bin/");
		assert_eq!(config.endpoints.token.as_str(), "http://127.0.0.1:8080/cgi-bin/token");
	}

	#[test]
	fn builder_rejects_non_http_bases() {
		let err = AccountConfig::builder("wx-app", "secret")
			.api_base(url("mailto:ops@example.com"))
			.build()
			.expect_err("Non-http bases should be rejected.");

		assert!(matches!(err, ConfigError::UnsupportedApiBase { .. }));
	}

	#[test]
	fn debug_output_redacts_secret() {
		let config = AccountConfig::builder("wx-app", "super-secret")
			.build()
			.expect("Default configuration should build.");
		let rendered = format!("{config:?}");

		assert!(rendered.contains("wx-app"));
		assert!(!rendered.contains("super-secret"));
	}
}
