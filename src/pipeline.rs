/*!
 * Pipeline orchestration: extraction, translation and rendering of one document.
 *
 * A run moves through `Idle → Extracting → Translating → Rendering → Done`.
 * Any stage error moves straight to `Failed` and later stages are never
 * invoked. The detailed error is logged and kept on the outcome; the message
 * meant for the user is the same whichever stage failed.
 */

use log::{debug, error, info};

use crate::app_config::Config;
use crate::document::{Document, Extraction, RenderedDocument, TranslationRequest};
use crate::errors::{PipelineError, UserFacingError};
use crate::extractor;
use crate::file_utils::FileManager;
use crate::providers::{TranslationProviderImpl, Translator};
use crate::rendering::PdfRenderer;

/// Where a pipeline run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Extracting,
    Translating,
    Rendering,
    Done,
    Failed,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::Translating => "translating",
            Self::Rendering => "rendering",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct TranslationOutput {
    /// Translated text, for display
    pub translated_text: String,
    /// Rendered PDF, for download
    pub document: RenderedDocument,
}

/// How a run ended
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Done(TranslationOutput),
    Failed {
        /// Detailed error, for logs and tests
        error: PipelineError,
        /// Generic message shown to the user
        message: UserFacingError,
    },
}

impl PipelineOutcome {
    fn failed(error: PipelineError) -> Self {
        let message = error.to_user_facing();
        Self::Failed { error, message }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn output(&self) -> Option<&TranslationOutput> {
        match self {
            Self::Done(output) => Some(output),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            Self::Done(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    pub fn user_message(&self) -> Option<&UserFacingError> {
        match self {
            Self::Done(_) => None,
            Self::Failed { message, .. } => Some(message),
        }
    }

    pub fn into_result(self) -> Result<TranslationOutput, PipelineError> {
        match self {
            Self::Done(output) => Ok(output),
            Self::Failed { error, .. } => Err(error),
        }
    }
}

/// Drives one document through extraction, translation and rendering
#[derive(Debug)]
pub struct PipelineOrchestrator {
    config: Config,
    translator: Box<dyn Translator>,
    renderer: PdfRenderer,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl PipelineOrchestrator {
    /// Build an orchestrator using the backend selected in `config`
    pub fn new(config: Config) -> Self {
        let translator = TranslationProviderImpl::from_config(&config);
        Self::with_translator(config, translator)
    }

    /// Build an orchestrator around an explicit translator
    pub fn with_translator(config: Config, translator: impl Translator + 'static) -> Self {
        let renderer = PdfRenderer::new(config.render.clone());
        Self {
            config,
            translator: Box::new(translator),
            renderer,
            state: PipelineState::Idle,
            history: vec![PipelineState::Idle],
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// States visited by the most recent run, starting with `Idle`
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Extract text for display without translating.
    ///
    /// Needs no credentials and leaves the run state untouched.
    pub fn preview(&self, document: &Document) -> Extraction {
        extractor::extract(document)
    }

    /// Run the whole pipeline for `document`
    pub async fn run(&mut self, document: &Document) -> PipelineOutcome {
        self.state = PipelineState::Idle;
        self.history = vec![PipelineState::Idle];

        match self.run_stages(document).await {
            Ok(output) => {
                self.transition(PipelineState::Done);
                PipelineOutcome::Done(output)
            }
            Err(e) => {
                error!("Processing {} failed during {}: {}", document.name(), e.stage(), e);
                self.transition(PipelineState::Failed);
                PipelineOutcome::failed(e)
            }
        }
    }

    async fn run_stages(&mut self, document: &Document) -> Result<TranslationOutput, PipelineError> {
        self.config.validate()?;

        self.transition(PipelineState::Extracting);
        let text = extractor::extract(document).into_result()?;
        info!("Extracted {} chars from {} ({})", text.as_str().chars().count(), document.name(), document.kind());

        self.transition(PipelineState::Translating);
        let request = TranslationRequest::new(text.into_string());
        let translated_text = self.translator.translate(&request).await?;
        info!("Translated with {}: {} chars", self.translator.name(), translated_text.chars().count());

        self.transition(PipelineState::Rendering);
        let filename = FileManager::translated_filename(document.name());
        let rendered = self.renderer.render(&translated_text, filename)?;

        Ok(TranslationOutput {
            translated_text,
            document: rendered,
        })
    }

    fn transition(&mut self, next: PipelineState) {
        debug!("Pipeline {} -> {}", self.state, next);
        self.state = next;
        self.history.push(next);
    }
}
