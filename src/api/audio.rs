//! Audio endpoints under `/audio/`.
//!
//! Transcription and translation upload an audio file and return JSON.
//! Speech synthesis sends JSON and returns the raw audio stream; a failed
//! synthesis still answers with a JSON error envelope, which surfaces as
//! [`ClientError::Service`] carrying the raw body.

use bytes::Bytes;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::api::Usage;
use crate::client::{Client, ClientError};
use crate::form::{FileSource, FormFile, MultipartRequest};
use crate::http::{Binary, Json};

pub const TRANSCRIPTIONS_ENDPOINT: &str = "audio/transcriptions";
pub const TRANSLATIONS_ENDPOINT: &str = "audio/translations";
pub const SPEECH_ENDPOINT: &str = "audio/speech";

pub const RESPONSE_FORMAT_JSON: &str = "json";

pub const VOICE_ALLOY: &str = "alloy";
pub const VOICE_ECHO: &str = "echo";
pub const VOICE_FABLE: &str = "fable";
pub const VOICE_ONYX: &str = "onyx";
pub const VOICE_NOVA: &str = "nova";
pub const VOICE_SHIMMER: &str = "shimmer";

pub const SPEECH_FORMAT_MP3: &str = "mp3";
pub const SPEECH_FORMAT_OPUS: &str = "opus";
pub const SPEECH_FORMAT_AAC: &str = "aac";
pub const SPEECH_FORMAT_FLAC: &str = "flac";

/// Transcribe audio into the input language.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionRequest {
    /// mp3, mp4, mpeg, mpga, m4a, wav or webm; local path or URL.
    pub file: FileSource,
    pub model: String,
    pub prompt: Option<String>,
    pub response_format: Option<String>,
    pub temperature: Option<f64>,
    /// ISO-639-1 code of the input language.
    pub language: Option<String>,
}

impl TranscriptionRequest {
    pub fn new(file: impl Into<FileSource>, model: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            model: model.into(),
            prompt: None,
            response_format: None,
            temperature: None,
            language: None,
        }
    }

    fn into_form(self) -> MultipartRequest {
        MultipartRequest::new()
            .text("model", self.model)
            .text_opt("prompt", self.prompt)
            .text_opt("response_format", self.response_format)
            .text_opt("temperature", self.temperature)
            .text_opt("language", self.language)
            .file(FormFile::from_source("file", self.file))
    }
}

/// Translate audio into English.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub file: FileSource,
    pub model: String,
    pub prompt: Option<String>,
    pub response_format: Option<String>,
    pub temperature: Option<f64>,
}

impl TranslationRequest {
    pub fn new(file: impl Into<FileSource>, model: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            model: model.into(),
            prompt: None,
            response_format: None,
            temperature: None,
        }
    }

    fn into_form(self) -> MultipartRequest {
        MultipartRequest::new()
            .text("model", self.model)
            .text_opt("prompt", self.prompt)
            .text_opt("response_format", self.response_format)
            .text_opt("temperature", self.temperature)
            .file(FormFile::from_source("file", self.file))
    }
}

/// Shared response of transcription and translation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioTextResponse {
    pub text: String,
    pub usage: Option<Usage>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub model: String,
    /// At most 4096 characters.
    pub input: String,
    pub voice: String,
    pub response_format: Option<String>,
    /// 0.25 to 4.0, default 1.0.
    pub speed: Option<f64>,
}

impl SpeechRequest {
    pub fn new(model: impl Into<String>, input: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            voice: voice.into(),
            ..Default::default()
        }
    }
}

impl Client {
    pub async fn create_transcription(
        &self,
        request: TranscriptionRequest,
        organization_id: Option<&str>,
    ) -> Result<AudioTextResponse, ClientError> {
        self.send_multipart::<Json<AudioTextResponse>>(
            request.into_form(),
            &self.endpoint(TRANSCRIPTIONS_ENDPOINT),
            Method::POST,
            organization_id,
        )
        .await
    }

    pub async fn create_translation(
        &self,
        request: TranslationRequest,
        organization_id: Option<&str>,
    ) -> Result<AudioTextResponse, ClientError> {
        self.send_multipart::<Json<AudioTextResponse>>(
            request.into_form(),
            &self.endpoint(TRANSLATIONS_ENDPOINT),
            Method::POST,
            organization_id,
        )
        .await
    }

    /// Synthesize speech and return the encoded audio.
    pub async fn create_speech(
        &self,
        request: &SpeechRequest,
        organization_id: Option<&str>,
    ) -> Result<Bytes, ClientError> {
        self.send_json::<Binary, _>(
            Some(request),
            &self.endpoint(SPEECH_ENDPOINT),
            Method::POST,
            organization_id,
        )
        .await
    }
}
