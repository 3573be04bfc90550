//! Image uploads: inline article images and permanent cover materials.

// self
use crate::{
	_prelude::*,
	client::MpClient,
	http::{ApiHttpClient, ApiRequest, MediaFile},
	obs::OperationKind,
};

/// Permanent image material stored by the platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
	/// Durable id, reusable as a draft's `thumb_media_id`.
	pub media_id: String,
	/// Platform-hosted URL of the image.
	pub url: String,
}

#[derive(Deserialize)]
struct UploadedImage {
	url: String,
}

impl<C> MpClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Uploads an image for use inside article HTML and returns its URL.
	///
	/// The returned URL is only accepted inside article content; it cannot serve as a cover.
	pub async fn upload_article_image(&self, path: impl AsRef<Path>) -> Result<String> {
		let media = MediaFile::inspect(path).await?;
		let endpoint = self.account().endpoints.upload_image.clone();
		let request = ApiRequest::post_media(endpoint, media);
		let uploaded: UploadedImage =
			self.observed_call(OperationKind::UploadArticleImage, request).await?;

		Ok(uploaded.url)
	}

	/// Uploads a permanent image material, typically an article cover.
	pub async fn upload_material(&self, path: impl AsRef<Path>) -> Result<Material> {
		let media = MediaFile::inspect(path).await?;
		let endpoint = self.account().endpoints.add_material.clone();

		self.observed_call(
			OperationKind::UploadMaterial,
			ApiRequest::post_media(endpoint, media).query("type", "image"),
		)
		.await
	}
}
