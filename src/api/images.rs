//! Image generation, edits and variations under `/images/`.
//!
//! Generation takes a JSON body. Edits and variations upload the source image
//! (and optional mask) as multipart file parts; each can be a local path or a
//! URL, see [`FileSource`].

use base64::Engine as _;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::client::{Client, ClientError};
use crate::form::{FileSource, FormFile, MultipartRequest};
use crate::http::Json;

pub const GENERATIONS_ENDPOINT: &str = "images/generations";
pub const EDITS_ENDPOINT: &str = "images/edits";
pub const VARIATIONS_ENDPOINT: &str = "images/variations";

pub const SIZE_SMALL: &str = "256x256";
pub const SIZE_MEDIUM: &str = "512x512";
pub const SIZE_LARGE: &str = "1024x1024";

pub const RESPONSE_FORMAT_URL: &str = "url";
pub const RESPONSE_FORMAT_B64_JSON: &str = "b64_json";

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub model: Option<String>,
    pub n: Option<u64>,
    pub size: Option<String>,
    pub response_format: Option<String>,
    pub user: Option<String>,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }
}

/// Edit `image` according to `prompt`, optionally restricted by `mask`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEditRequest {
    pub image: FileSource,
    /// Display name of the image part; defaults to the source's last segment.
    pub image_name: Option<String>,
    pub mask: Option<FileSource>,
    pub mask_name: Option<String>,
    pub prompt: String,
    pub n: Option<u64>,
    pub size: Option<String>,
    pub response_format: Option<String>,
    pub user: Option<String>,
}

impl ImageEditRequest {
    pub fn new(image: impl Into<FileSource>, prompt: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            image_name: None,
            mask: None,
            mask_name: None,
            prompt: prompt.into(),
            n: None,
            size: None,
            response_format: None,
            user: None,
        }
    }

    fn into_form(self) -> MultipartRequest {
        let mut form = MultipartRequest::new()
            .text("prompt", self.prompt)
            .text_opt("n", self.n)
            .text_opt("size", self.size)
            .text_opt("response_format", self.response_format)
            .text_opt("user", self.user)
            .file(file_part("image", self.image, self.image_name));
        if let Some(mask) = self.mask {
            form = form.file(file_part("mask", mask, self.mask_name));
        }
        form
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageVariationRequest {
    pub image: FileSource,
    pub image_name: Option<String>,
    pub n: Option<u64>,
    pub size: Option<String>,
    pub response_format: Option<String>,
    pub user: Option<String>,
}

impl ImageVariationRequest {
    pub fn new(image: impl Into<FileSource>) -> Self {
        Self {
            image: image.into(),
            image_name: None,
            n: None,
            size: None,
            response_format: None,
            user: None,
        }
    }

    fn into_form(self) -> MultipartRequest {
        MultipartRequest::new()
            .text_opt("n", self.n)
            .text_opt("size", self.size)
            .text_opt("response_format", self.response_format)
            .text_opt("user", self.user)
            .file(file_part("image", self.image, self.image_name))
    }
}

fn file_part(field: &str, source: FileSource, name: Option<String>) -> FormFile {
    match name {
        Some(name) => FormFile::new(field, name, source),
        None => FormFile::from_source(field, source),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageResponse {
    pub created: u64,
    pub data: Vec<ImageData>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageData {
    pub url: Option<String>,
    pub b64_json: Option<String>,
    pub revised_prompt: Option<String>,
}

impl ImageData {
    /// Decode the `b64_json` payload, if the image was returned inline.
    pub fn decode_b64(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.b64_json
            .as_deref()
            .map(|data| base64::engine::general_purpose::STANDARD.decode(data))
    }
}

impl Client {
    /// Create images from a prompt.
    pub async fn create_image(
        &self,
        request: &ImageRequest,
        organization_id: Option<&str>,
    ) -> Result<ImageResponse, ClientError> {
        self.send_json::<Json<ImageResponse>, _>(
            Some(request),
            &self.endpoint(GENERATIONS_ENDPOINT),
            Method::POST,
            organization_id,
        )
        .await
    }

    /// Create an edited or extended image from an original image and a prompt.
    pub async fn create_image_edit(
        &self,
        request: ImageEditRequest,
        organization_id: Option<&str>,
    ) -> Result<ImageResponse, ClientError> {
        self.send_multipart::<Json<ImageResponse>>(
            request.into_form(),
            &self.endpoint(EDITS_ENDPOINT),
            Method::POST,
            organization_id,
        )
        .await
    }

    /// Create variations of an image.
    pub async fn create_image_variation(
        &self,
        request: ImageVariationRequest,
        organization_id: Option<&str>,
    ) -> Result<ImageResponse, ClientError> {
        self.send_multipart::<Json<ImageResponse>>(
            request.into_form(),
            &self.endpoint(VARIATIONS_ENDPOINT),
            Method::POST,
            organization_id,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_form_writes_only_set_fields() {
        let mut request = ImageEditRequest::new("/tmp/otter.png", "add a hat");
        request.n = Some(2);
        request.mask = Some(FileSource::parse("https://example.com/masks/mask.png"));

        let form = request.into_form();
        assert_eq!(
            form.fields(),
            &[
                ("prompt".to_string(), "add a hat".to_string()),
                ("n".to_string(), "2".to_string()),
            ]
        );
        let names: Vec<_> = form
            .files()
            .iter()
            .map(|file| (file.field.as_str(), file.filename.as_str()))
            .collect();
        assert_eq!(names, vec![("image", "otter.png"), ("mask", "mask.png")]);
    }

    #[test]
    fn decodes_inline_image() {
        let data = ImageData {
            b64_json: Some("iVBORw==".to_string()),
            ..Default::default()
        };
        assert_eq!(
            data.decode_b64().unwrap().unwrap(),
            vec![0x89, b'P', b'N', b'G']
        );
    }
}
