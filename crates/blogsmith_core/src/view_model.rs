use crate::{CredentialStatus, OutputFormat, RunId, SessionState, Stage, TopicSource};

/// Number of characters of the final post shown before `show` is used.
pub const PREVIEW_CHARS: usize = 1_200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchView {
    pub keywords: Vec<String>,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionProgressView {
    pub completed: usize,
    pub total: usize,
    pub last_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifactView {
    pub format: OutputFormat,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub credential: CredentialStatus,
    pub topic: String,
    pub topic_source: TopicSource,
    pub output_format: OutputFormat,
    pub session: SessionState,
    pub run_id: RunId,
    pub stage: Option<Stage>,
    pub research: Option<ResearchView>,
    pub outline_titles: Vec<String>,
    pub section_progress: Option<SectionProgressView>,
    pub final_content: Option<String>,
    pub show_full_post: bool,
    pub saved_artifacts: Vec<SavedArtifactView>,
    pub last_error: Option<String>,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

impl AppViewModel {
    /// The part of the final post to display: everything after `show`, a
    /// char-boundary-safe preview otherwise.
    pub fn post_excerpt(&self) -> Option<(&str, bool)> {
        let content = self.final_content.as_deref()?;
        if self.show_full_post {
            return Some((content, false));
        }
        match content.char_indices().nth(PREVIEW_CHARS) {
            Some((end, _)) => Some((&content[..end], true)),
            None => Some((content, false)),
        }
    }
}
