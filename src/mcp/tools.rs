//! Tool registry: schema declarations and typed dispatch into [`MpClient`].

// self
use crate::{
	_prelude::*,
	client::{Article, MpClient},
	http::ApiHttpClient,
	mcp::protocol::ToolDefinition,
};

/// Names of every registered tool, in declaration order.
pub const TOOL_NAMES: [&str; 5] =
	["upload_article_image", "upload_cover_image", "create_draft", "publish_draft", "delete_draft"];

/// Failures raised while turning a `tools/call` request into a [`ToolCall`].
#[derive(Debug, ThisError)]
pub enum ToolError {
	/// No tool with this name is registered.
	#[error("Unknown tool: {name}")]
	UnknownTool {
		/// Requested tool name.
		name: String,
	},
	/// Arguments do not match the tool's schema.
	#[error("Invalid arguments for `{tool}`: {source}")]
	InvalidArguments {
		/// Tool name.
		tool: String,
		/// Decoding failure with the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Arguments of the image upload tools.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePathArgs {
	/// Absolute path to the image file.
	pub file_path: PathBuf,
}

/// Arguments of `create_draft`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreateDraftArgs {
	/// Article title.
	pub title: String,
	/// Article HTML content.
	pub content: String,
	/// Media id of the cover image.
	pub thumb_media_id: String,
	/// Author name.
	#[serde(default)]
	pub author: Option<String>,
	/// Summary.
	#[serde(default)]
	pub digest: Option<String>,
	/// Original source URL.
	#[serde(default)]
	pub content_source_url: Option<String>,
}
impl From<CreateDraftArgs> for Article {
	fn from(args: CreateDraftArgs) -> Self {
		Self {
			title: args.title,
			content: args.content,
			thumb_media_id: args.thumb_media_id,
			author: args.author,
			digest: args.digest,
			content_source_url: args.content_source_url,
		}
	}
}

/// Arguments of the draft id tools.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MediaIdArgs {
	/// Draft media id.
	pub media_id: String,
}

/// A decoded tool invocation: one variant per tool, each with typed arguments.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum ToolCall {
	/// `upload_article_image`
	UploadArticleImage(FilePathArgs),
	/// `upload_cover_image`
	UploadCoverImage(FilePathArgs),
	/// `create_draft`
	CreateDraft(CreateDraftArgs),
	/// `publish_draft`
	PublishDraft(MediaIdArgs),
	/// `delete_draft`
	DeleteDraft(MediaIdArgs),
}
impl ToolCall {
	/// Decodes `arguments` for the tool called `name`.
	///
	/// Missing arguments are treated as an empty object so schema errors name the missing field.
	pub fn decode(name: &str, arguments: Option<Value>) -> Result<Self, ToolError> {
		if !TOOL_NAMES.contains(&name) {
			return Err(ToolError::UnknownTool { name: name.to_owned() });
		}

		let arguments = arguments.unwrap_or_else(|| json!({}));
		let tagged = json!({ "name": name, "arguments": arguments });

		serde_path_to_error::deserialize(tagged)
			.map_err(|source| ToolError::InvalidArguments { tool: name.to_owned(), source })
	}

	/// Registered name of this call's tool.
	pub fn name(&self) -> &'static str {
		match self {
			Self::UploadArticleImage(_) => "upload_article_image",
			Self::UploadCoverImage(_) => "upload_cover_image",
			Self::CreateDraft(_) => "create_draft",
			Self::PublishDraft(_) => "publish_draft",
			Self::DeleteDraft(_) => "delete_draft",
		}
	}

	/// Runs the call against `client` and returns the JSON payload for the tool result.
	pub async fn invoke<C>(self, client: &MpClient<C>) -> Result<Value>
	where
		C: ?Sized + ApiHttpClient,
	{
		match self {
			Self::UploadArticleImage(args) => {
				let url = client.upload_article_image(&args.file_path).await?;

				Ok(json!({ "url": url }))
			},
			Self::UploadCoverImage(args) => {
				let material = client.upload_material(&args.file_path).await?;

				Ok(json!({ "media_id": material.media_id, "url": material.url }))
			},
			Self::CreateDraft(args) => {
				let draft_id = client.add_draft(&[args.into()]).await?;

				Ok(json!({ "draft_id": draft_id }))
			},
			Self::PublishDraft(args) => {
				let publish_id = client.publish_draft(&args.media_id).await?;

				Ok(json!({ "publish_id": publish_id }))
			},
			Self::DeleteDraft(args) => {
				client.delete_draft(&args.media_id).await?;

				Ok(json!({ "deleted": true, "media_id": args.media_id }))
			},
		}
	}
}

/// Declarations served by `tools/list`.
pub fn tool_definitions() -> Vec<ToolDefinition> {
	let file_path = json!({
		"type": "object",
		"properties": {
			"filePath": { "type": "string", "description": "Absolute path to the image file" },
		},
		"required": ["filePath"],
	});

	vec![
		ToolDefinition {
			name: "upload_article_image".into(),
			description: "Upload an image for use INSIDE article content (returns URL).".into(),
			input_schema: file_path.clone(),
		},
		ToolDefinition {
			name: "upload_cover_image".into(),
			description: "Upload an image for use as article COVER/THUMBNAIL (returns media_id)."
				.into(),
			input_schema: file_path,
		},
		ToolDefinition {
			name: "create_draft".into(),
			description: "Create a new article draft (saves to Draft Box).".into(),
			input_schema: json!({
				"type": "object",
				"properties": {
					"title": { "type": "string", "description": "Article title" },
					"content": { "type": "string", "description": "Article HTML content" },
					"thumb_media_id": {
						"type": "string",
						"description": "Media ID of cover image",
					},
					"author": { "type": "string", "description": "Author name (optional)" },
					"digest": {
						"type": "string",
						"description": "Article digest/summary (optional)",
					},
					"content_source_url": {
						"type": "string",
						"description": "Original source URL (optional)",
					},
				},
				"required": ["title", "content", "thumb_media_id"],
			}),
		},
		ToolDefinition {
			name: "publish_draft".into(),
			description: "Publish a draft by its Media ID (Freepublish).".into(),
			input_schema: json!({
				"type": "object",
				"properties": {
					"media_id": { "type": "string", "description": "Draft Media ID" },
				},
				"required": ["media_id"],
			}),
		},
		ToolDefinition {
			name: "delete_draft".into(),
			description: "Delete a draft from the Draft Box.".into(),
			input_schema: json!({
				"type": "object",
				"properties": {
					"media_id": { "type": "string", "description": "Draft Media ID to delete" },
				},
				"required": ["media_id"],
			}),
		},
	]
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn definitions_match_registered_names() {
		let names = tool_definitions().into_iter().map(|tool| tool.name).collect::<Vec<_>>();

		assert_eq!(names, TOOL_NAMES);
	}

	#[test]
	fn decode_builds_typed_variants() {
		let call = ToolCall::decode(
			"create_draft",
			Some(json!({ "title": "T", "content": "<p>C</p>", "thumb_media_id": "M1" })),
		)
		.expect("Complete draft arguments should decode.");

		assert_eq!(call.name(), "create_draft");
		assert!(matches!(
			call,
			ToolCall::CreateDraft(CreateDraftArgs { ref thumb_media_id, author: None, .. })
				if thumb_media_id == "M1"
		));

		let call = ToolCall::decode("upload_cover_image", Some(json!({ "filePath": "/tmp/c.png" })))
			.expect("File path arguments should decode.");

		assert_eq!(
			call,
			ToolCall::UploadCoverImage(FilePathArgs { file_path: PathBuf::from("/tmp/c.png") })
		);
	}

	#[test]
	fn decode_rejects_missing_required_fields() {
		for missing in ["title", "content", "thumb_media_id"] {
			let mut arguments = json!({ "title": "T", "content": "C", "thumb_media_id": "M1" });

			arguments.as_object_mut().expect("Fixture is an object.").remove(missing);

			let err = ToolCall::decode("create_draft", Some(arguments))
				.expect_err("Missing required fields should be rejected.");

			assert!(err.to_string().contains(missing), "{err} should name `{missing}`.");
		}

		let err = ToolCall::decode("publish_draft", None)
			.expect_err("Absent arguments should be rejected.");

		assert!(matches!(err, ToolError::InvalidArguments { .. }));
		assert!(err.to_string().contains("media_id"));
	}

	#[test]
	fn decode_rejects_unknown_tools() {
		let err = ToolCall::decode("list_drafts", Some(json!({})))
			.expect_err("Unknown tools should be rejected.");

		assert_eq!(err.to_string(), "Unknown tool: list_drafts");
	}
}
