//! Blogsmith engine: prompts, inference, pipeline stages and export.
mod config;
mod convert;
mod engine;
mod export;
mod huggingface;
mod inference;
mod outline;
mod pdf;
mod persist;
mod pipeline;
mod prompt;
mod research;
mod stages;
mod types;

pub use config::{ApiToken, ConfigError, InferenceSettings, PipelineSettings, TOKEN_ENV_VAR};
pub use convert::{markdown_to_html, markdown_to_plain_text};
pub use engine::{EngineHandle, EngineSettings};
pub use export::{export, save_artifact, ExportArtifact, ExportError, ExportFormat};
pub use huggingface::HuggingFaceClient;
pub use inference::{InferenceClient, InferenceError, InferenceFailureKind};
pub use outline::{Outline, OutlineSection};
pub use pdf::render_pdf;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::{BlogPost, Pipeline, PipelineError};
pub use prompt::{PromptError, PromptTemplate, OUTLINE_PROMPT, REVIEW_PROMPT, SECTION_PROMPT, SEO_PROMPT};
pub use research::{research_topic, ResearchData, Topic, TopicError, DEFAULT_KEYWORDS, DEFAULT_SOURCES};
pub use stages::{create_outline, generate_full_content, generate_section, optimize_content, review_content};
pub use types::{ChannelProgressSink, EngineEvent, PipelineProgress, ProgressSink, RunId, Stage};
