use thiserror::Error;

use engine_logging::{engine_info, engine_warn};

use crate::stages::{create_outline, generate_full_content, optimize_content, review_content};
use crate::{
    research_topic, EngineEvent, InferenceClient, InferenceError, InferenceFailureKind, Outline,
    PipelineProgress, PipelineSettings, ProgressSink, PromptError, ResearchData, RunId, Stage,
    Topic, TopicError,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("invalid topic: {0}")]
    Topic(#[from] TopicError),
    #[error("{stage} stage could not build its prompt: {source}")]
    Prompt {
        stage: Stage,
        #[source]
        source: PromptError,
    },
    #[error("{stage} stage failed: {source}")]
    Inference {
        stage: Stage,
        #[source]
        source: InferenceError,
    },
}

impl PipelineError {
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Topic(_) => None,
            PipelineError::Prompt { stage, .. } | PipelineError::Inference { stage, .. } => {
                Some(*stage)
            }
        }
    }

    /// What the user can do about the failure.
    pub fn hint(&self) -> &'static str {
        match self {
            PipelineError::Topic(_) => "Pick a trending topic or enter a non-empty custom topic.",
            PipelineError::Prompt { .. } => "This is a bug in a prompt template; please report it.",
            PipelineError::Inference { source, .. } => match source.kind {
                InferenceFailureKind::Auth => {
                    "Check that HUGGINGFACEHUB_API_TOKEN is valid and has inference access."
                }
                InferenceFailureKind::RateLimited => {
                    "The endpoint is rate limiting requests; wait a minute and generate again."
                }
                InferenceFailureKind::Transport | InferenceFailureKind::Timeout => {
                    "Check your network connection and generate again."
                }
                InferenceFailureKind::HttpStatus(_) => {
                    "The endpoint reported an error; the model may still be loading. Try again shortly."
                }
                InferenceFailureKind::EmptyResponse | InferenceFailureKind::InvalidResponse => {
                    "The model returned an unusable answer; generating again usually helps."
                }
                InferenceFailureKind::Configuration => {
                    "Check BLOGSMITH_ENDPOINT and BLOGSMITH_MODEL."
                }
            },
        }
    }
}

/// Every intermediate product of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    pub research: ResearchData,
    pub outline: Outline,
    pub draft: String,
    pub optimized: String,
    pub content: String,
}

/// Runs research, outline, sections, SEO and review in order.
pub struct Pipeline<'a> {
    client: &'a dyn InferenceClient,
    settings: PipelineSettings,
}

impl<'a> Pipeline<'a> {
    pub fn new(client: &'a dyn InferenceClient, settings: PipelineSettings) -> Self {
        Self { client, settings }
    }

    pub async fn run(
        &self,
        run_id: RunId,
        topic: &str,
        sink: &dyn ProgressSink,
    ) -> Result<BlogPost, PipelineError> {
        let topic = Topic::new(topic)?;
        engine_info!("run {} started for topic '{}'", run_id, topic);

        emit_stage(sink, run_id, Stage::Research);
        let research = research_topic(&topic);
        sink.emit(EngineEvent::Progress(PipelineProgress::ResearchReady {
            run_id,
            research: research.clone(),
        }));

        emit_stage(sink, run_id, Stage::Outline);
        let outline = create_outline(self.client, &research).await?;
        engine_info!("run {} outline has {} sections", run_id, outline.len());
        sink.emit(EngineEvent::Progress(PipelineProgress::OutlineReady {
            run_id,
            outline: outline.clone(),
        }));

        emit_stage(sink, run_id, Stage::Sections);
        let mut on_section = |completed: usize, total: usize, section: &crate::OutlineSection| {
            sink.emit(EngineEvent::Progress(PipelineProgress::SectionWritten {
                run_id,
                completed,
                total,
                title: section.title.clone(),
            }));
        };
        let draft =
            generate_full_content(self.client, &outline, &self.settings, &mut on_section).await?;
        if draft.is_empty() {
            engine_warn!("run {} produced an empty draft", run_id);
        }

        emit_stage(sink, run_id, Stage::Optimize);
        let optimized = optimize_content(self.client, &draft, &research.keywords).await?;

        emit_stage(sink, run_id, Stage::Review);
        let content = review_content(self.client, &optimized).await?;
        engine_info!("run {} finished ({} chars)", run_id, content.len());

        Ok(BlogPost {
            research,
            outline,
            draft,
            optimized,
            content,
        })
    }
}

fn emit_stage(sink: &dyn ProgressSink, run_id: RunId, stage: Stage) {
    sink.emit(EngineEvent::Progress(PipelineProgress::StageStarted {
        run_id,
        stage,
    }));
}
