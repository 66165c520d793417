use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc;

use crate::{BlogPost, ExportError, ExportFormat, Outline, PipelineError, ResearchData};

pub type RunId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Research,
    Outline,
    Sections,
    Optimize,
    Review,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Research => "research",
            Stage::Outline => "outline",
            Stage::Sections => "section writing",
            Stage::Optimize => "SEO optimization",
            Stage::Review => "review",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineProgress {
    StageStarted {
        run_id: RunId,
        stage: Stage,
    },
    ResearchReady {
        run_id: RunId,
        research: ResearchData,
    },
    OutlineReady {
        run_id: RunId,
        outline: Outline,
    },
    SectionWritten {
        run_id: RunId,
        completed: usize,
        total: usize,
        title: String,
    },
}

#[derive(Debug)]
pub enum EngineEvent {
    Progress(PipelineProgress),
    GenerationCompleted {
        run_id: RunId,
        result: Result<BlogPost, PipelineError>,
    },
    ExportCompleted {
        format: ExportFormat,
        result: Result<PathBuf, ExportError>,
    },
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
