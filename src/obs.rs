//! Optional observability helpers for API operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `wechat_mp.operation` with the `operation`
//!   and `stage` (call site) fields, plus debug/warn events for cache hits, refreshes, and
//!   failures.
//! - Enable `metrics` to increment the `wechat_mp_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Remote operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
	/// Client-credential token exchange.
	Token,
	/// Inline article image upload.
	UploadArticleImage,
	/// Permanent image material upload.
	UploadMaterial,
	/// Draft creation.
	AddDraft,
	/// Draft publishing.
	PublishDraft,
	/// Draft deletion.
	DeleteDraft,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Token => "token",
			OperationKind::UploadArticleImage => "upload_article_image",
			OperationKind::UploadMaterial => "upload_material",
			OperationKind::AddDraft => "add_draft",
			OperationKind::PublishDraft => "publish_draft",
			OperationKind::DeleteDraft => "delete_draft",
		}
	}

	/// Returns the verb phrase used in failure messages (`Failed to <action>: ...`).
	pub const fn action(self) -> &'static str {
		match self {
			OperationKind::Token => "get access token",
			OperationKind::UploadArticleImage => "upload image",
			OperationKind::UploadMaterial => "upload material",
			OperationKind::AddDraft => "create draft",
			OperationKind::PublishDraft => "publish",
			OperationKind::DeleteDraft => "delete draft",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside an operation span and records attempt/success/failure around it.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub(crate) async fn observe<T, Fut>(kind: OperationKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OperationSpan::new(kind, stage);

	record_outcome(kind, Outcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_outcome(kind, Outcome::Success),
		Err(e) => {
			record_outcome(kind, Outcome::Failure);
			event!(warn, operation = kind.as_str(), error = %e, "Operation failed.");
		},
	}

	result
}
