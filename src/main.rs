use iced::task;
use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, scrollable, text, text_input, Column};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod state;
mod ui;

use api::GenerationClient;
use config::Config;
use error::GenerateError;
use state::data::{format_size, load_selected_image, SelectedImage};
use state::workflow::{Completion, Submission, SubmissionToken, Workflow};
use ui::notification::{modal, Notice};
use ui::widgets::{card, primary_button, secondary_button};

/// Height of the selected-image preview and the generated image
const IMAGE_HEIGHT: f32 = 260.0;

/// Main application state
struct GhibliArt {
    /// Selected image, prompt, in-flight submission and result location
    workflow: Workflow,
    /// Client for the generation endpoint
    client: GenerationClient,
    /// Decoded preview of the selected file
    preview: Option<Handle>,
    /// Downloaded generated image, once available
    result_image: Option<Handle>,
    /// Blocking notification currently shown
    notice: Option<Notice>,
    /// Abort handle of the in-flight request
    request: Option<task::Handle>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Choose File"
    PickImage,
    /// Picked file finished loading from disk
    ImageLoaded(Result<SelectedImage, String>),
    /// User edited the prompt
    PromptChanged(String),
    /// User clicked generate (or pressed Enter in the prompt)
    Submit,
    /// User abandoned the in-flight generation
    Cancel,
    /// Network round trip for a submission settled
    GenerationFinished(SubmissionToken, Result<String, GenerateError>),
    /// Generated image download settled
    ResultImageLoaded(String, Result<Vec<u8>, GenerateError>),
    /// User acknowledged the notification
    DismissNotice,
}

impl GhibliArt {
    /// Create a new instance of the application
    fn new(client: GenerationClient) -> (Self, Task<Message>) {
        tracing::info!("🎨 Ghibli Art initialized, endpoint {}", client.endpoint());

        (
            GhibliArt {
                workflow: Workflow::new(),
                client,
                preview: None,
                result_image: None,
                notice: None,
                request: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => {
                let file = FileDialog::new().set_title("Choose an Image").pick_file();

                match file {
                    Some(path) => Task::perform(load_selected_image(path), Message::ImageLoaded),
                    None => Task::none(),
                }
            }
            Message::ImageLoaded(Ok(image)) => {
                // Oversized files are never loaded, so they get no preview
                self.preview = image
                    .contents()
                    .map(|bytes| Handle::from_bytes(bytes.to_vec()));
                self.workflow.select_image(image);
                Task::none()
            }
            Message::ImageLoaded(Err(err)) => {
                tracing::warn!("{}", err);
                self.notice = Some(Notice::new("Could not open file", err));
                Task::none()
            }
            Message::PromptChanged(prompt) => {
                self.workflow.set_prompt(prompt);
                Task::none()
            }
            Message::Submit => self.submit(),
            Message::Cancel => {
                if let Some(token) = self.workflow.cancel() {
                    if let Some(request) = self.request.take() {
                        request.abort();
                    }
                    tracing::info!("cancelled submission {:?}", token);
                }
                Task::none()
            }
            Message::GenerationFinished(token, outcome) => self.finish(token, outcome),
            Message::ResultImageLoaded(location, outcome) => {
                // A newer result may have arrived while this one downloaded
                if self.workflow.result_location() != Some(location.as_str()) {
                    return Task::none();
                }
                match outcome {
                    Ok(bytes) => self.result_image = Some(Handle::from_bytes(bytes)),
                    Err(err) => tracing::warn!("failed to download {}: {}", location, err),
                }
                Task::none()
            }
            Message::DismissNotice => {
                self.notice = None;
                Task::none()
            }
        }
    }

    /// Validate and launch a generation request
    fn submit(&mut self) -> Task<Message> {
        let Submission {
            token,
            image,
            prompt,
        } = match self.workflow.begin_submit() {
            Ok(submission) => submission,
            Err(err) => {
                let err = GenerateError::from(err);
                tracing::warn!("submission rejected: {}", err);
                self.notice = Some(Notice::new("Cannot generate yet", err.user_message()));
                return Task::none();
            }
        };

        tracing::info!("⏳ sending request to backend ({:?})", token);

        let client = self.client.clone();
        let (request, handle) = Task::perform(
            async move { client.generate(image, prompt).await },
            move |outcome| Message::GenerationFinished(token, outcome),
        )
        .abortable();

        self.request = Some(handle);
        request
    }

    /// Apply a settled generation to the workflow
    fn finish(
        &mut self,
        token: SubmissionToken,
        outcome: Result<String, GenerateError>,
    ) -> Task<Message> {
        match self.workflow.complete(token, outcome) {
            Completion::Stale => {
                tracing::debug!("discarding response for superseded {:?}", token);
                Task::none()
            }
            Completion::Failed(err) => {
                self.request = None;
                tracing::error!("❌ generation failed: {}", err);
                self.notice = Some(Notice::new("Generation failed", err.user_message()));
                Task::none()
            }
            Completion::Succeeded(location) => {
                self.request = None;
                self.result_image = None;
                tracing::info!("✅ generated image at {}", location);

                let client = self.client.clone();
                let download = location.clone();
                Task::perform(
                    async move { client.fetch_image(download).await },
                    move |outcome| Message::ResultImageLoaded(location.clone(), outcome),
                )
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut picker: Column<Message> = column![button("Choose File")
            .on_press(Message::PickImage)
            .padding([8, 16])]
        .spacing(10)
        .align_x(Alignment::Center);

        if let Some(preview) = &self.preview {
            picker = picker.push(
                image(preview.clone())
                    .width(Length::Fill)
                    .height(IMAGE_HEIGHT),
            );
        }
        if let Some(selected) = self.workflow.selected_image() {
            picker = picker.push(
                text(format!(
                    "{} · {}",
                    selected.file_name,
                    format_size(selected.size())
                ))
                .size(12),
            );
        }

        let prompt = text_input("Enter a prompt", self.workflow.prompt())
            .on_input(Message::PromptChanged)
            .on_submit(Message::Submit)
            .padding(8);

        let submitting = self.workflow.is_submitting();
        let mut actions = column![primary_button(
            if submitting {
                "Processing..."
            } else {
                "Generate Ghibli Art"
            },
            (!submitting).then_some(Message::Submit),
        )]
        .spacing(8)
        .align_x(Alignment::Center);

        if submitting {
            actions = actions.push(secondary_button("Cancel", Message::Cancel));
        }

        let output: Element<Message> = match (&self.result_image, self.workflow.result_location()) {
            (Some(result), _) => image(result.clone())
                .width(Length::Fill)
                .height(IMAGE_HEIGHT)
                .into(),
            (None, Some(location)) => text(location).size(12).into(),
            (None, None) => text(
                "No output generated yet. Please upload an image and enter a prompt.",
            )
            .size(14)
            .into(),
        };

        let content: Column<Message> = column![
            text("Ghibli Art Generator").size(32),
            card(
                column![picker, prompt, actions, output]
                    .spacing(24)
                    .align_x(Alignment::Center)
            ),
        ]
        .spacing(20)
        .padding(40)
        .align_x(Alignment::Center);

        let page = scrollable(container(content).center_x(Length::Fill));

        match &self.notice {
            Some(notice) => modal(page, notice, Message::DismissNotice),
            None => page.into(),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "ghibli_art=info".into()),
        )
        .init();

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!("⚠️  {}; using default configuration", err);
        Config::default()
    });
    let client = GenerationClient::new(&config)?;

    iced::application("Ghibli Art Generator", GhibliArt::update, GhibliArt::view)
        .theme(GhibliArt::theme)
        .centered()
        .run_with(move || GhibliArt::new(client))?;

    Ok(())
}
