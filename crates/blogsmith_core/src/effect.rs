use crate::{OutputFormat, RunId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the whole generation pipeline for a topic.
    RunPipeline { run_id: RunId, topic: String },
    /// Export the final post and offer it for download.
    ExportArtifact {
        format: OutputFormat,
        content: String,
        file_stem: String,
    },
}
