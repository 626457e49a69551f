//! Chunked story composition.

use crate::GenerationSession;
use crate::segmenter::{first_chars, last_chars};
use storyloom_core::{
    ProgressUpdate, SamplingParams, StoryMetadata, StructuredRequest, TextRequest,
};
use storyloom_error::{PipelineError, PipelineErrorKind, StoryloomResult};
use storyloom_interface::{ProgressSink, StructuredGeneration, TextGeneration};
use storyloom_retry::{ComposerConfig, RetryAttempt, RetryPolicy, StoryloomConfig};
use tracing::{debug, error, info, instrument, warn};

/// System instruction sent with every story segment request.
pub const SYSTEM_INSTRUCTION: &str = "You are a world-class novelist. Your task is to write a coherent and engaging story based on a user's prompt. The story must be detailed, realistic, and avoid repetition. You will be writing the story in parts. I will provide you with the story written so far, and you must continue it seamlessly. IMPORTANT: Begin your response directly with the story text. Do not add any introductory phrases, conversational filler, or greetings like 'Tentu,', 'Here is the next part,', or similar preamble. Go straight to the point and continue the narrative.";

const FALLBACK_LANGUAGE: &str = "English";

/// How a composition run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionOutcome {
    /// Every segment was generated and metadata was requested
    Completed,
    /// The cancellation flag stopped the run before segment `next_segment`
    Cancelled {
        /// First segment that was not generated
        next_segment: usize,
    },
}

/// Drives sequential segment generation for a [`GenerationSession`].
///
/// Segment `i + 1` is never requested before segment `i` is appended.
#[derive(Debug, Clone)]
pub struct StoryComposer<D> {
    driver: D,
    story_model: String,
    utility_model: String,
    sampling: SamplingParams,
    policy: RetryPolicy,
    windows: ComposerConfig,
}

impl<D> StoryComposer<D>
where
    D: TextGeneration + StructuredGeneration,
{
    /// Composer with default models, sampling and windows.
    pub fn new(driver: D) -> Self {
        Self::from_config(driver, &StoryloomConfig::default())
    }

    /// Composer configured from `[models]`, `[sampling]`,
    /// `[retry.story_segment]` and `[composer]`.
    pub fn from_config(driver: D, config: &StoryloomConfig) -> Self {
        Self {
            driver,
            story_model: config.models.story.clone(),
            utility_model: config.models.utility.clone(),
            sampling: config.sampling,
            policy: config.retry.story_segment,
            windows: config.composer,
        }
    }

    /// Override the segment retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Generate every segment of `session`, then its metadata.
    ///
    /// Cancellation is checked before each segment. A segment that exhausts
    /// its retries ends the whole run; the text generated so far stays in
    /// the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionAborted` when a segment fails for good. An error status
    /// has already been reported through `progress` by then.
    #[instrument(skip(self, session, progress), fields(tier = %session.tier(), prompt_chars = session.prompt().chars().count()))]
    pub async fn compose(
        &self,
        session: &mut GenerationSession,
        progress: &dyn ProgressSink,
    ) -> StoryloomResult<CompositionOutcome> {
        let count = session.tier().chunk_count();
        let budget = session.tier().char_budget();
        info!(count, budget, "Starting story composition");

        for index in 0..count {
            let percentage = ProgressUpdate::fraction(index, count);

            if session.is_cancelled() {
                info!(completed = index, "Story generation cancelled");
                progress.report(
                    session.advance(ProgressUpdate::status(percentage, "Generation stopped by user.")),
                );
                return Ok(CompositionOutcome::Cancelled {
                    next_segment: index,
                });
            }

            let context = last_chars(session.text(), self.windows.context_chars);
            let prompt = segment_prompt(session.prompt(), index, count, budget, context);
            let request = TextRequest::builder()
                .model(self.story_model.as_str())
                .prompt(prompt)
                .system_instruction(SYSTEM_INSTRUCTION)
                .sampling(self.sampling)
                .build()
                .map_err(|e| PipelineError::new(PipelineErrorKind::InvalidRequest(e)))?;

            let on_retry = |notice: &RetryAttempt| {
                progress.report(ProgressUpdate::status(percentage, notice.status()));
            };
            let generated = match self
                .policy
                .run(
                    "story segment",
                    || self.driver.generate_text(&request),
                    &on_retry,
                )
                .await
            {
                Ok(text) => text,
                Err(e) => {
                    error!(segment = index, error = %e, "Story segment failed, aborting session");
                    progress.report(session.advance(ProgressUpdate::status(
                        percentage,
                        format!(
                            "Error: {}. Please check your API key and network connection.",
                            e
                        ),
                    )));
                    return Err(PipelineError::new(PipelineErrorKind::SessionAborted {
                        segment: index,
                        message: e.to_string(),
                    })
                    .into());
                }
            };

            let is_last = index + 1 == count;
            let text = if is_last {
                generated
            } else {
                truncate_to_budget(&generated, budget).to_string()
            };
            debug!(segment = index, chars = text.chars().count(), "Segment finalized");

            let chunk = session.append_segment(text, budget).text().clone();
            let status = if is_last {
                "Finishing the story...".to_string()
            } else {
                format!("Weaving part {} of {}...", index + 2, count)
            };
            progress.report(session.advance(
                ProgressUpdate::status(ProgressUpdate::fraction(index + 1, count), status)
                    .with_chunk(chunk),
            ));
        }

        if session.text().trim().is_empty() {
            warn!("Story is empty, skipping metadata");
            progress.report(session.advance(ProgressUpdate::status(100.0, "Story generation complete!")));
            return Ok(CompositionOutcome::Completed);
        }

        progress.report(session.advance(ProgressUpdate::status(100.0, "Generating story details...")));
        let details = self.story_details(session.text()).await;
        session.set_metadata(details.clone());
        progress.report(session.advance(
            ProgressUpdate::status(100.0, "Story generation complete!").with_details(details),
        ));
        info!(segments = session.segments().len(), "Story generation complete");
        Ok(CompositionOutcome::Completed)
    }

    /// Detect the story language from its opening. Falls back to English.
    #[instrument(skip(self, story))]
    pub async fn detect_language(&self, story: &str) -> String {
        let sample = first_chars(story, self.windows.language_sample_chars);
        let prompt = format!(
            "Identify the primary language of the following text. Respond with only the name of the language (e.g., \"English\", \"Indonesian\").\n\nText: \"{}\"",
            sample
        );
        let request = match TextRequest::builder()
            .model(self.utility_model.as_str())
            .prompt(prompt)
            .build()
        {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Could not build language detection request");
                return FALLBACK_LANGUAGE.to_string();
            }
        };

        match self.driver.generate_text(&request).await {
            Ok(answer) => detect_language_answer(&answer),
            Err(e) => {
                warn!(error = %e, "Language detection failed, defaulting to English");
                FALLBACK_LANGUAGE.to_string()
            }
        }
    }

    /// Request synopsis, hashtags and tags in the story's language.
    ///
    /// Any failure yields `None`.
    #[instrument(skip(self, story), fields(story_chars = story.chars().count()))]
    pub async fn story_details(&self, story: &str) -> Option<StoryMetadata> {
        let language = self.detect_language(story).await;
        debug!(language = %language, "Detected story language");

        let prompt = format!(
            "Based on the following story, please generate a brief synopsis, a list of relevant social media hashtags, and a list of keywords/tags for categorization. IMPORTANT: Generate all content in {language}.\n\nStory:\n---\n{}\n---\n\nPlease provide the output in JSON format.",
            first_chars(story, self.windows.metadata_chars)
        );
        let request = StructuredRequest {
            model: self.utility_model.clone(),
            prompt,
            schema: StoryMetadata::response_schema(&language),
        };

        let value = match self.driver.generate_json(&request).await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to generate story details");
                return None;
            }
        };
        match serde_json::from_value::<StoryMetadata>(value) {
            Ok(mut metadata) => {
                metadata.language = language;
                Some(metadata)
            }
            Err(e) => {
                warn!(error = %e, "Story details did not match the schema");
                None
            }
        }
    }
}

/// Prompt for segment `index` of `count`.
fn segment_prompt(idea: &str, index: usize, count: usize, budget: usize, context: &str) -> String {
    if count == 1 {
        format!(
            "Here is the story idea: \"{idea}\". Write a complete short story of approximately {budget} characters based on this idea. The story should have a clear beginning, middle, and a conclusive end."
        )
    } else if index == 0 {
        format!(
            "Here is the story idea: \"{idea}\". Begin writing the first part of the story. Write approximately {budget} characters. Do not write the whole story, just the beginning."
        )
    } else if index + 1 == count {
        format!(
            "Here is the original story idea: \"{idea}\".\nHere is the story so far:\n---\n{context}\n---\nThis is the final part of the story. Please bring the narrative to a satisfying and conclusive end. Resolve the main plot, complete character arcs, and provide a definitive resolution. Write this final part to complete the story."
        )
    } else {
        format!(
            "Here is the original story idea: \"{idea}\".\nHere is the story so far:\n---\n{context}\n---\nPlease continue the story from where it left off. Introduce new plot points, deepen character development, and maintain a realistic and engaging narrative. Do not repeat previous events or descriptions. Write the next part of the story, approximately {budget} characters long. Do not summarize or end the story. Just write the next part."
        )
    }
}

/// Cut `text` to at most `budget` characters, preferring a sentence end.
///
/// Text within budget is returned whole. Otherwise the text is cut at
/// `budget` characters; if the last `.`, `!` or `?` in the cut sits at
/// character position `p >= 0.8 * budget`, the result ends just after it.
///
/// # Examples
///
/// ```
/// use storyloom_pipeline::truncate_to_budget;
///
/// assert_eq!(truncate_to_budget("Short.", 10), "Short.");
/// assert_eq!(truncate_to_budget("Abcdefgh. Overflow", 10), "Abcdefgh.");
/// assert_eq!(truncate_to_budget("Ab. Cdefghijklmno", 10), "Ab. Cdefgh");
/// ```
pub fn truncate_to_budget(text: &str, budget: usize) -> &str {
    let Some((cut, _)) = text.char_indices().nth(budget) else {
        return text;
    };
    let head = &text[..cut];
    if let Some(end) = head.rfind(['.', '!', '?']) {
        let position = head[..end].chars().count();
        if position * 5 >= budget * 4 {
            return &head[..=end];
        }
    }
    head
}

/// Validate a language-detection answer: one word under 20 characters.
///
/// # Examples
///
/// ```
/// use storyloom_pipeline::detect_language_answer;
///
/// assert_eq!(detect_language_answer(" Indonesian\n"), "Indonesian");
/// assert_eq!(detect_language_answer("The language is French"), "English");
/// assert_eq!(detect_language_answer(""), "English");
/// ```
pub fn detect_language_answer(answer: &str) -> String {
    let language = answer.trim();
    if !language.is_empty() && !language.contains(' ') && language.chars().count() < 20 {
        language.to_string()
    } else {
        FALLBACK_LANGUAGE.to_string()
    }
}
