/*!
 * # tarjome - document translation into Persian
 *
 * A Rust library that extracts text from a PDF, subtitle or plain-text
 * document, translates it into Persian with a hosted AI backend and renders
 * the result as a right-to-left PDF.
 *
 * ## Features
 *
 * - Text extraction from PDF, SRT subtitle and plain-text documents
 * - Translation through one of two backends:
 *   - Hugging Face Inference (free tier, optional token)
 *   - OpenAI chat completions (paid, API key required)
 * - Right-aligned PDF output with an embedded Persian font
 * - A stage-tagged error taxonomy behind one generic user-facing message
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `document`: Values carried through one run (documents, text, PDFs)
 * - `extractor`: Text extraction per document kind
 * - `providers`: Client implementations for the translation backends:
 *   - `providers::huggingface`: Hugging Face Inference client
 *   - `providers::openai`: OpenAI API client
 *   - `providers::mock`: Scripted translator for tests
 * - `rendering`: PDF layout, bidi reordering and font embedding
 * - `pipeline`: The extraction → translation → rendering state machine
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations and output naming
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod document;
pub mod errors;
pub mod extractor;
pub mod file_utils;
pub mod pipeline;
pub mod providers;
pub mod rendering;

// Re-export main types for easier usage
pub use app_config::{Config, ProviderKind};
pub use document::{Document, DocumentKind, ExtractedText, Extraction, RenderedDocument};
pub use errors::{ExtractionError, PipelineError, ProviderError, RenderError, Stage, UserFacingError};
pub use pipeline::{PipelineOrchestrator, PipelineOutcome, PipelineState, TranslationOutput};
pub use providers::Translator;
pub use rendering::PdfRenderer;
