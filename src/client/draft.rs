//! Draft box operations: create, publish, delete.

// self
use crate::{
	_prelude::*,
	client::{Acknowledged, MpClient},
	http::{ApiHttpClient, ApiRequest},
	obs::OperationKind,
};

/// Article submitted as part of a draft batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
	/// Article title.
	pub title: String,
	/// Article HTML content.
	pub content: String,
	/// Media id of the permanent cover material.
	pub thumb_media_id: String,
	/// Author name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub author: Option<String>,
	/// Summary shown in share cards.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub digest: Option<String>,
	/// "Read more" link target.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub content_source_url: Option<String>,
}
impl Article {
	/// Creates an article with the required fields set.
	pub fn new(
		title: impl Into<String>,
		content: impl Into<String>,
		thumb_media_id: impl Into<String>,
	) -> Self {
		Self {
			title: title.into(),
			content: content.into(),
			thumb_media_id: thumb_media_id.into(),
			author: None,
			digest: None,
			content_source_url: None,
		}
	}

	/// Sets the author.
	pub fn with_author(mut self, author: impl Into<String>) -> Self {
		self.author = Some(author.into());

		self
	}

	/// Sets the digest.
	pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
		self.digest = Some(digest.into());

		self
	}

	/// Sets the source URL.
	pub fn with_content_source_url(mut self, url: impl Into<String>) -> Self {
		self.content_source_url = Some(url.into());

		self
	}

	/// Checks that every required field is present.
	pub fn validate(&self) -> Result<()> {
		for (field, value) in [
			("title", &self.title),
			("content", &self.content),
			("thumb_media_id", &self.thumb_media_id),
		] {
			if value.trim().is_empty() {
				return Err(Error::invalid_argument(format!("article `{field}` is required")));
			}
		}

		Ok(())
	}
}

#[derive(Deserialize)]
struct CreatedDraft {
	media_id: String,
}

#[derive(Deserialize)]
struct SubmittedPublish {
	publish_id: Value,
}

impl<C> MpClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Saves `articles` to the draft box and returns the batch's draft id.
	///
	/// Batches are currently limited to exactly one article.
	pub async fn add_draft(&self, articles: &[Article]) -> Result<String> {
		let [article] = articles else {
			return Err(Error::invalid_argument(format!(
				"a draft must contain exactly one article, got {}",
				articles.len()
			)));
		};

		article.validate()?;

		let endpoint = self.account().endpoints.add_draft.clone();
		let body = json!({ "articles": [article] });
		let request = ApiRequest::post_json(endpoint, body);
		let created: CreatedDraft = self.observed_call(OperationKind::AddDraft, request).await?;

		Ok(created.media_id)
	}

	/// Submits a draft for publishing and returns the publish job id.
	///
	/// The draft id is not checked locally; the platform decides whether it exists.
	pub async fn publish_draft(&self, draft_id: &str) -> Result<String> {
		validate_draft_id(draft_id)?;

		let endpoint = self.account().endpoints.submit_publish.clone();
		let request = ApiRequest::post_json(endpoint, json!({ "media_id": draft_id }));
		let submitted: SubmittedPublish =
			self.observed_call(OperationKind::PublishDraft, request).await?;

		Ok(match submitted.publish_id {
			Value::String(id) => id,
			other => other.to_string(),
		})
	}

	/// Deletes a draft from the draft box.
	pub async fn delete_draft(&self, draft_id: &str) -> Result<()> {
		validate_draft_id(draft_id)?;

		let endpoint = self.account().endpoints.delete_draft.clone();
		let request = ApiRequest::post_json(endpoint, json!({ "media_id": draft_id }));
		let _: Acknowledged = self.observed_call(OperationKind::DeleteDraft, request).await?;

		Ok(())
	}
}

fn validate_draft_id(draft_id: &str) -> Result<()> {
	if draft_id.trim().is_empty() {
		Err(Error::invalid_argument("draft id cannot be empty"))
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn optional_fields_are_omitted_from_payload() {
		let article = Article::new("Title", "<p>Body</p>", "M1").with_author("Ops");
		let payload = serde_json::to_value(&article).expect("Article should serialize.");

		assert_eq!(
			payload,
			json!({
				"title": "Title",
				"content": "<p>Body</p>",
				"thumb_media_id": "M1",
				"author": "Ops",
			})
		);
	}

	#[test]
	fn validate_names_the_missing_field() {
		let err = Article::new("Title", "  ", "M1")
			.validate()
			.expect_err("Blank content should be rejected.");

		assert_eq!(err.to_string(), "Invalid argument: article `content` is required.");
		assert!(Article::new("Title", "Body", "M1").validate().is_ok());
		assert!(validate_draft_id("").is_err());
	}
}
