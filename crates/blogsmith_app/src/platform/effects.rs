use std::path::PathBuf;
use std::sync::Arc;

use blogsmith_core::{Effect, GenerationOutcome, Msg, OutputFormat, Stage};
use blogsmith_engine::{
    EngineEvent, EngineHandle, EngineSettings, ExportFormat, InferenceClient, PipelineProgress,
    PipelineSettings,
};
use engine_logging::{engine_info, engine_warn};

/// Turns core effects into engine commands and engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        client: Arc<dyn InferenceClient>,
        pipeline: PipelineSettings,
        output_dir: PathBuf,
    ) -> std::io::Result<Self> {
        let settings = EngineSettings {
            pipeline,
            output_dir,
        };
        let engine = EngineHandle::new(client, settings)?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RunPipeline { run_id, topic } => {
                    engine_info!("RunPipeline run_id={} topic={}", run_id, topic);
                    self.engine.generate(run_id, topic);
                }
                Effect::ExportArtifact {
                    format,
                    content,
                    file_stem,
                } => {
                    engine_info!(
                        "ExportArtifact format={} content_len={}",
                        format,
                        content.len()
                    );
                    self.engine.export(to_engine_format(format), content, file_stem);
                }
            }
        }
    }

    /// Drains every event the engine has produced so far.
    pub fn pump_events(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            msgs.push(event_to_msg(event));
        }
        msgs
    }
}

fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(PipelineProgress::StageStarted { run_id, stage }) => {
            Msg::StageStarted {
                run_id,
                stage: map_stage(stage),
            }
        }
        EngineEvent::Progress(PipelineProgress::ResearchReady { run_id, research }) => {
            Msg::ResearchReady {
                run_id,
                keywords: research.keywords,
                sources: research.sources,
            }
        }
        EngineEvent::Progress(PipelineProgress::OutlineReady { run_id, outline }) => {
            Msg::OutlineReady {
                run_id,
                titles: outline.titles(),
            }
        }
        EngineEvent::Progress(PipelineProgress::SectionWritten {
            run_id,
            completed,
            total,
            title,
        }) => Msg::SectionWritten {
            run_id,
            completed,
            total,
            title,
        },
        EngineEvent::GenerationCompleted { run_id, result } => {
            let outcome = match result {
                Ok(post) => GenerationOutcome::Completed {
                    content: post.content,
                },
                Err(err) => {
                    engine_warn!("Run {} failed: {}", run_id, err);
                    GenerationOutcome::Failed {
                        message: format!("{err}. {}", err.hint()),
                    }
                }
            };
            Msg::GenerationFinished { run_id, outcome }
        }
        EngineEvent::ExportCompleted { format, result } => match result {
            Ok(path) => Msg::ArtifactSaved {
                format: from_engine_format(format),
                path: path.display().to_string(),
            },
            Err(err) => Msg::ExportFailed {
                format: from_engine_format(format),
                message: err.to_string(),
            },
        },
    }
}

fn map_stage(stage: blogsmith_engine::Stage) -> Stage {
    match stage {
        blogsmith_engine::Stage::Research => Stage::Research,
        blogsmith_engine::Stage::Outline => Stage::Outline,
        blogsmith_engine::Stage::Sections => Stage::Sections,
        blogsmith_engine::Stage::Optimize => Stage::Optimize,
        blogsmith_engine::Stage::Review => Stage::Review,
    }
}

fn to_engine_format(format: OutputFormat) -> ExportFormat {
    match format {
        OutputFormat::Markdown => ExportFormat::Markdown,
        OutputFormat::Html => ExportFormat::Html,
        OutputFormat::Pdf => ExportFormat::Pdf,
        OutputFormat::Text => ExportFormat::Text,
    }
}

fn from_engine_format(format: ExportFormat) -> OutputFormat {
    match format {
        ExportFormat::Markdown => OutputFormat::Markdown,
        ExportFormat::Html => OutputFormat::Html,
        ExportFormat::Pdf => OutputFormat::Pdf,
        ExportFormat::Text => OutputFormat::Text,
    }
}
