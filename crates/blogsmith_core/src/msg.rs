use crate::{OutputFormat, RunId, Stage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked one of the trending topics (zero-based index).
    TrendingTopicSelected(usize),
    /// User typed a custom topic.
    CustomTopicEntered(String),
    /// User changed the output format selector.
    OutputFormatSelected(OutputFormat),
    /// User clicked Generate.
    GenerateClicked,
    /// User asked for an additional export of the finished post.
    ExportClicked(OutputFormat),
    /// User asked to see the whole post instead of the preview.
    ShowPostClicked,
    /// Engine entered a pipeline stage.
    StageStarted { run_id: RunId, stage: Stage },
    /// Engine produced the research data.
    ResearchReady {
        run_id: RunId,
        keywords: Vec<String>,
        sources: Vec<String>,
    },
    /// Engine parsed the outline.
    OutlineReady { run_id: RunId, titles: Vec<String> },
    /// Engine finished one section.
    SectionWritten {
        run_id: RunId,
        completed: usize,
        total: usize,
        title: String,
    },
    /// Engine finished the pipeline.
    GenerationFinished {
        run_id: RunId,
        outcome: GenerationOutcome,
    },
    /// An exported artifact was written to disk.
    ArtifactSaved { format: OutputFormat, path: String },
    /// Export or writing of an artifact failed.
    ExportFailed { format: OutputFormat, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed { content: String },
    Failed { message: String },
}
