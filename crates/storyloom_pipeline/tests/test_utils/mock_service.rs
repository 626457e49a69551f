//! Scripted mock of the generative service.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storyloom_core::{ImageRequest, SpeechRequest, StructuredRequest, TextRequest};
use storyloom_error::{GeminiError, GeminiErrorKind, StoryloomError, StoryloomResult};
use storyloom_interface::{
    GenerativeDriver, ImageSynthesis, SpeechSynthesis, StructuredGeneration, TextGeneration,
};

/// A scripted outcome; errors are raised as Gemini errors.
pub type MockResult<T> = Result<T, GeminiErrorKind>;

type SpeechResponder = Arc<dyn Fn(&SpeechRequest) -> (Duration, MockResult<Vec<u8>>) + Send + Sync>;

/// Bytes returned by the image endpoint when nothing is scripted.
pub const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];

/// Default speech behaviour: every byte of the text twice, no delay.
pub fn echo_pcm(text: &str) -> Vec<u8> {
    text.bytes().flat_map(|b| [b, b]).collect()
}

#[derive(Default)]
struct MockState {
    texts: VecDeque<MockResult<String>>,
    json: VecDeque<MockResult<Value>>,
    images: VecDeque<MockResult<Vec<u8>>>,
    text_requests: Vec<TextRequest>,
    json_requests: Vec<StructuredRequest>,
    speech_requests: Vec<SpeechRequest>,
    image_requests: Vec<ImageRequest>,
}

/// Mock service implementing every capability trait.
///
/// Text and image replies are consumed from FIFO scripts; once a script is
/// empty the mock falls back to a fixed default. Every request is captured.
#[derive(Clone)]
pub struct MockService {
    state: Arc<Mutex<MockState>>,
    default_text: String,
    speech: SpeechResponder,
}

impl MockService {
    /// Mock answering "English" to text, valid metadata to JSON, echoed PCM
    /// to speech and [`PNG_MAGIC`] to images.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            default_text: "English".to_string(),
            speech: Arc::new(|req: &SpeechRequest| (Duration::ZERO, Ok(echo_pcm(&req.text)))),
        }
    }

    /// Queue a text reply.
    pub fn with_text(self, reply: MockResult<String>) -> Self {
        self.state.lock().unwrap().texts.push_back(reply);
        self
    }

    /// Queue several successful text replies.
    pub fn with_texts<I, S>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut state = self.state.lock().unwrap();
            state.texts.extend(replies.into_iter().map(|s| Ok(s.into())));
        }
        self
    }

    /// Text returned once the script runs out.
    pub fn with_default_text(mut self, text: impl Into<String>) -> Self {
        self.default_text = text.into();
        self
    }

    /// Queue a JSON reply.
    pub fn with_json(self, reply: MockResult<Value>) -> Self {
        self.state.lock().unwrap().json.push_back(reply);
        self
    }

    /// Queue an image reply.
    pub fn with_image(self, reply: MockResult<Vec<u8>>) -> Self {
        self.state.lock().unwrap().images.push_back(reply);
        self
    }

    /// Replace the speech behaviour.
    pub fn with_speech<F>(mut self, responder: F) -> Self
    where
        F: Fn(&SpeechRequest) -> (Duration, MockResult<Vec<u8>>) + Send + Sync + 'static,
    {
        self.speech = Arc::new(responder);
        self
    }

    pub fn text_requests(&self) -> Vec<TextRequest> {
        self.state.lock().unwrap().text_requests.clone()
    }

    pub fn json_requests(&self) -> Vec<StructuredRequest> {
        self.state.lock().unwrap().json_requests.clone()
    }

    pub fn speech_requests(&self) -> Vec<SpeechRequest> {
        self.state.lock().unwrap().speech_requests.clone()
    }

    pub fn image_requests(&self) -> Vec<ImageRequest> {
        self.state.lock().unwrap().image_requests.clone()
    }

    pub fn text_calls(&self) -> usize {
        self.state.lock().unwrap().text_requests.len()
    }

    pub fn json_calls(&self) -> usize {
        self.state.lock().unwrap().json_requests.len()
    }

    pub fn speech_calls(&self) -> usize {
        self.state.lock().unwrap().speech_requests.len()
    }

    pub fn image_calls(&self) -> usize {
        self.state.lock().unwrap().image_requests.len()
    }
}

fn raise(kind: GeminiErrorKind) -> StoryloomError {
    GeminiError::new(kind).into()
}

fn default_metadata() -> Value {
    json!({
        "synopsis": "A keeper tends the light through a long storm.",
        "hashtags": ["#lighthouse", "#storm"],
        "tags": ["sea", "solitude"]
    })
}

impl GenerativeDriver for MockService {
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[async_trait]
impl TextGeneration for MockService {
    async fn generate_text(&self, req: &TextRequest) -> StoryloomResult<String> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.text_requests.push(req.clone());
            state.texts.pop_front()
        };
        reply
            .unwrap_or_else(|| Ok(self.default_text.clone()))
            .map_err(raise)
    }
}

#[async_trait]
impl StructuredGeneration for MockService {
    async fn generate_json(&self, req: &StructuredRequest) -> StoryloomResult<Value> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.json_requests.push(req.clone());
            state.json.pop_front()
        };
        reply.unwrap_or_else(|| Ok(default_metadata())).map_err(raise)
    }
}

#[async_trait]
impl SpeechSynthesis for MockService {
    async fn synthesize_speech(&self, req: &SpeechRequest) -> StoryloomResult<Vec<u8>> {
        self.state.lock().unwrap().speech_requests.push(req.clone());
        let (delay, reply) = (self.speech)(req);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply.map_err(raise)
    }
}

#[async_trait]
impl ImageSynthesis for MockService {
    async fn synthesize_image(&self, req: &ImageRequest) -> StoryloomResult<Vec<u8>> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.image_requests.push(req.clone());
            state.images.pop_front()
        };
        reply.unwrap_or_else(|| Ok(PNG_MAGIC.to_vec())).map_err(raise)
    }
}
