//! Gemini REST client.

use super::dto::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    OutputOptions, PredictInstance, PredictParameters, PredictRequest, PredictResponse,
    SpeechConfig,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use storyloom_core::{ImageRequest, SpeechRequest, StructuredRequest, TextRequest};
use storyloom_error::{GeminiError, GeminiErrorKind, GeminiResult, StoryloomResult};
use storyloom_interface::{
    GenerativeDriver, ImageSynthesis, SpeechSynthesis, StructuredGeneration, TextGeneration,
};
use storyloom_retry::ApiConfig;
use tracing::{debug, error, instrument, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Client for the Generative Language REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client reading the API key from `GEMINI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if the variable is unset or empty.
    pub fn new() -> GeminiResult<Self> {
        Self::from_config(&ApiConfig::default())
    }

    /// Create a client from the `[api]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if the configured variable is unset or empty,
    /// or `ClientCreation` if the HTTP client cannot be built.
    pub fn from_config(api: &ApiConfig) -> GeminiResult<Self> {
        let api_key = std::env::var(&api.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingApiKey(api.api_key_env.clone())))?;
        Self::with_base_url(api_key, &api.base_url, Duration::from_secs(api.timeout_secs))
    }

    /// Create a client with an explicit key and endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ClientCreation` if the HTTP client cannot be built.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> GeminiResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string()))
        })?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "Creating new Gemini client");
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url,
        })
    }

    /// Create a client with an explicit key against the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ClientCreation` if the HTTP client cannot be built.
    pub fn with_api_key(api_key: impl Into<String>) -> GeminiResult<Self> {
        Self::with_base_url(
            api_key,
            DEFAULT_BASE_URL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Name of the environment variable read by [`new`](Self::new).
    pub fn default_api_key_env() -> &'static str {
        DEFAULT_API_KEY_ENV
    }

    /// Endpoint URL for `model` and `method`.
    pub fn endpoint(&self, model: &str, method: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    /// Send a JSON request and decode the JSON response.
    #[instrument(skip(self, body), fields(url = %url))]
    async fn post<Req, Resp>(&self, url: &str, body: &Req) -> GeminiResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to Gemini API");
                GeminiError::new(GeminiErrorKind::Transport(e.to_string()))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read Gemini response body");
            GeminiError::new(GeminiErrorKind::Transport(e.to_string()))
        })?;

        if !status.is_success() {
            let err = Self::error_from_response(status.as_u16(), &text);
            warn!(status = %status, error = %err, "Gemini API returned error");
            return Err(err);
        }

        serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, "Failed to parse Gemini response");
            GeminiError::new(GeminiErrorKind::ResponseParse(e.to_string()))
        })
    }

    /// Build an error from a non-success status and its body.
    ///
    /// The canonical status (e.g. `RESOURCE_EXHAUSTED`) is kept in the
    /// message so classification still works when proxies rewrite codes.
    pub fn error_from_response(status_code: u16, body: &str) -> GeminiError {
        let message = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) if !envelope.error.status.is_empty() => {
                format!("{}: {}", envelope.error.status, envelope.error.message)
            }
            Ok(envelope) => envelope.error.message,
            Err(_) if body.trim().is_empty() => "empty error body".to_string(),
            Err(_) => body.trim().to_string(),
        };
        GeminiError::new(GeminiErrorKind::HttpError {
            status_code,
            message,
        })
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let response: GenerateContentResponse = self
            .post(&self.endpoint(model, "generateContent"), request)
            .await?;
        if let Some(reason) = response.block_reason() {
            return Err(GeminiError::new(GeminiErrorKind::ApiRequest(format!(
                "Prompt blocked: {}",
                reason
            ))));
        }
        Ok(response)
    }

    fn decode(data: &str) -> GeminiResult<Vec<u8>> {
        STANDARD
            .decode(data)
            .map_err(|e| GeminiError::new(GeminiErrorKind::Base64Decode(e.to_string())))
    }

    /// Text generation returning the raw wire response text.
    #[instrument(skip(self, req), fields(model = %req.model()))]
    pub async fn generate_text_internal(&self, req: &TextRequest) -> GeminiResult<String> {
        let generation_config = req.sampling().as_ref().map(|sampling| GenerationConfig {
            temperature: Some(sampling.temperature),
            top_p: Some(sampling.top_p),
            top_k: Some(sampling.top_k),
            ..Default::default()
        });
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(req.prompt())],
            system_instruction: req.system_instruction().as_deref().map(Content::text),
            generation_config,
        };

        let response = self.generate_content(req.model(), &request).await?;
        response.text().ok_or_else(|| {
            GeminiError::new(GeminiErrorKind::EmptyResponse(
                "no text in response".to_string(),
            ))
        })
    }

    /// Structured generation returning parsed JSON.
    #[instrument(skip(self, req), fields(model = %req.model))]
    pub async fn generate_json_internal(
        &self,
        req: &StructuredRequest,
    ) -> GeminiResult<serde_json::Value> {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(&req.prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(req.schema.clone()),
                ..Default::default()
            }),
        };

        let response = self.generate_content(&req.model, &request).await?;
        let text = response.text().ok_or_else(|| {
            GeminiError::new(GeminiErrorKind::EmptyResponse(
                "no JSON in response".to_string(),
            ))
        })?;
        serde_json::from_str(text.trim())
            .map_err(|e| GeminiError::new(GeminiErrorKind::ResponseParse(e.to_string())))
    }

    /// Speech synthesis returning decoded PCM.
    #[instrument(skip(self, req), fields(model = %req.model, voice = %req.voice, chars = req.text.len()))]
    pub async fn synthesize_speech_internal(&self, req: &SpeechRequest) -> GeminiResult<Vec<u8>> {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(&req.text)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig::prebuilt(req.voice.as_ref())),
                ..Default::default()
            }),
        };

        let response = self.generate_content(&req.model, &request).await?;
        let data = response.inline_data().ok_or_else(|| {
            GeminiError::new(GeminiErrorKind::EmptyResponse(
                "no audio data in response".to_string(),
            ))
        })?;
        let pcm = Self::decode(data)?;
        if pcm.is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::EmptyResponse(
                "audio payload decoded to zero bytes".to_string(),
            )));
        }
        debug!(bytes = pcm.len(), "Received speech audio");
        Ok(pcm)
    }

    /// Image synthesis returning encoded image bytes.
    #[instrument(skip(self, req), fields(model = %req.model, aspect_ratio = %req.aspect_ratio))]
    pub async fn synthesize_image_internal(&self, req: &ImageRequest) -> GeminiResult<Vec<u8>> {
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: req.prompt.clone(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: req.aspect_ratio.clone(),
                output_options: OutputOptions {
                    mime_type: req.mime_type.clone(),
                },
            },
        };

        let response: PredictResponse = self
            .post(&self.endpoint(&req.model, "predict"), &request)
            .await?;
        let prediction = response.predictions.first();
        let data = prediction
            .and_then(|p| p.bytes_base64_encoded.as_deref())
            .filter(|data| !data.is_empty())
            .ok_or_else(|| {
                let reason = prediction
                    .and_then(|p| p.rai_filtered_reason.clone())
                    .unwrap_or_else(|| "no image in response".to_string());
                GeminiError::new(GeminiErrorKind::EmptyResponse(reason))
            })?;
        let bytes = Self::decode(data)?;
        debug!(bytes = bytes.len(), "Received image");
        Ok(bytes)
    }
}

impl GenerativeDriver for GeminiClient {
    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

#[async_trait::async_trait]
impl TextGeneration for GeminiClient {
    async fn generate_text(&self, req: &TextRequest) -> StoryloomResult<String> {
        self.generate_text_internal(req).await.map_err(Into::into)
    }
}

#[async_trait::async_trait]
impl StructuredGeneration for GeminiClient {
    async fn generate_json(&self, req: &StructuredRequest) -> StoryloomResult<serde_json::Value> {
        self.generate_json_internal(req).await.map_err(Into::into)
    }
}

#[async_trait::async_trait]
impl SpeechSynthesis for GeminiClient {
    async fn synthesize_speech(&self, req: &SpeechRequest) -> StoryloomResult<Vec<u8>> {
        self.synthesize_speech_internal(req).await.map_err(Into::into)
    }
}

#[async_trait::async_trait]
impl ImageSynthesis for GeminiClient {
    async fn synthesize_image(&self, req: &ImageRequest) -> StoryloomResult<Vec<u8>> {
        self.synthesize_image_internal(req).await.map_err(Into::into)
    }
}
