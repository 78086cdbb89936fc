/// The upload-and-generate workflow model
///
/// Holds the selected image, the prompt, the in-flight submission and the
/// last generated image location. A submission is split into two halves
/// driven by the update loop:
///
/// - `begin_submit` validates inputs and marks the workflow as submitting
/// - `complete` receives the network outcome and always clears the flag
///
/// Each submission gets a fresh `SubmissionToken`. Outcomes carrying a token
/// other than the in-flight one are stale and ignored.

use super::data::SelectedImage;
use crate::error::{GenerateError, ValidationError};

/// Largest file accepted for upload (5 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Sequence number identifying one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionToken(u64);

/// Everything the network call needs, captured at submit time
#[derive(Debug, Clone)]
pub struct Submission {
    pub token: SubmissionToken,
    pub image: SelectedImage,
    pub prompt: String,
}

/// What `complete` did with an outcome
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The result location was stored
    Succeeded(String),
    /// The submission failed; the previous result is untouched
    Failed(GenerateError),
    /// The outcome belongs to a superseded or cancelled submission
    Stale,
}

/// State of the upload-and-generate form
#[derive(Debug, Default)]
pub struct Workflow {
    /// Last picked file
    selected_image: Option<SelectedImage>,
    /// Prompt text, exactly as typed
    prompt: String,
    /// Token of the outstanding request; `Some` means submitting
    in_flight: Option<SubmissionToken>,
    /// Location of the last successfully generated image
    result_location: Option<String>,
    /// Highest token handed out so far
    last_token: u64,
}

impl Workflow {
    /// Idle workflow with nothing selected and no result
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly picked image. Validation is deferred to submission.
    pub fn select_image(&mut self, image: SelectedImage) {
        self.selected_image = Some(image);
    }

    /// Store the prompt verbatim
    pub fn set_prompt(&mut self, text: String) {
        self.prompt = text;
    }

    /// Validate inputs and start a submission.
    ///
    /// On error nothing changes and no request may be issued.
    pub fn begin_submit(&mut self) -> Result<Submission, ValidationError> {
        if self.in_flight.is_some() {
            return Err(ValidationError::SubmissionInFlight);
        }

        let image = match &self.selected_image {
            Some(image) if !self.prompt.is_empty() => image,
            _ => return Err(ValidationError::MissingInput),
        };

        // Oversized files are never loaded, so missing contents mean the same thing
        if image.size() > MAX_UPLOAD_BYTES || image.contents().is_none() {
            return Err(ValidationError::FileTooLarge {
                size: image.size(),
                limit: MAX_UPLOAD_BYTES,
            });
        }

        self.last_token += 1;
        let token = SubmissionToken(self.last_token);
        self.in_flight = Some(token);

        Ok(Submission {
            token,
            image: image.clone(),
            prompt: self.prompt.clone(),
        })
    }

    /// Settle a submission with its network outcome.
    pub fn complete(
        &mut self,
        token: SubmissionToken,
        outcome: Result<String, GenerateError>,
    ) -> Completion {
        if self.in_flight != Some(token) {
            return Completion::Stale;
        }
        self.in_flight = None;

        match outcome {
            Ok(location) => {
                self.result_location = Some(location.clone());
                Completion::Succeeded(location)
            }
            Err(err) => Completion::Failed(err),
        }
    }

    /// Abandon the in-flight submission, if any
    pub fn cancel(&mut self) -> Option<SubmissionToken> {
        self.in_flight.take()
    }

    /// Currently picked file, if any
    pub fn selected_image(&self) -> Option<&SelectedImage> {
        self.selected_image.as_ref()
    }

    /// Prompt as typed
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Token of the outstanding submission, if any
    pub fn in_flight(&self) -> Option<SubmissionToken> {
        self.in_flight
    }

    /// True only while a request is outstanding
    pub fn is_submitting(&self) -> bool {
        self.in_flight().is_some()
    }

    /// Location of the last generated image
    pub fn result_location(&self) -> Option<&str> {
        self.result_location.as_deref()
    }
}
