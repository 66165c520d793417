use std::fmt;
use std::str::FromStr;

use crate::view_model::{
    AppViewModel, Notice, NoticeLevel, ResearchView, SavedArtifactView, SectionProgressView,
};

pub type RunId = u64;

/// Preset topics offered by the topic selector.
pub const TRENDING_TOPICS: [&str; 5] = [
    "Remote Work Policies in 2024",
    "AI in HR: Current Trends",
    "Employee Wellness Programs",
    "Diversity and Inclusion Strategies",
    "Hybrid Work Best Practices",
];

/// File stem used for every downloaded artifact.
pub const DEFAULT_FILE_STEM: &str = "hr_blog";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicSource {
    Trending(usize),
    Custom(String),
}

impl Default for TopicSource {
    fn default() -> Self {
        Self::Trending(0)
    }
}

impl TopicSource {
    pub fn topic(&self) -> &str {
        match self {
            TopicSource::Trending(index) => TRENDING_TOPICS.get(*index).copied().unwrap_or(""),
            TopicSource::Custom(text) => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Html,
    Pdf,
    Text,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Markdown,
        OutputFormat::Html,
        OutputFormat::Pdf,
        OutputFormat::Text,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Html => "html",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Text => "txt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" | "htm" => Ok(OutputFormat::Html),
            "pdf" => Ok(OutputFormat::Pdf),
            "txt" | "text" => Ok(OutputFormat::Text),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Research,
    Outline,
    Sections,
    Optimize,
    Review,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Finished,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialStatus {
    #[default]
    Ready,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    credential: CredentialStatus,
    topic_source: TopicSource,
    output_format: OutputFormat,
    session: SessionState,
    run_id: RunId,
    stage: Option<Stage>,
    research: Option<ResearchView>,
    outline_titles: Vec<String>,
    section_progress: Option<SectionProgressView>,
    final_content: Option<String>,
    show_full_post: bool,
    saved_artifacts: Vec<SavedArtifactView>,
    last_error: Option<String>,
    notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: CredentialStatus) -> Self {
        Self {
            credential,
            dirty: true,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            credential: self.credential,
            topic: self.topic_source.topic().to_string(),
            topic_source: self.topic_source.clone(),
            output_format: self.output_format,
            session: self.session,
            run_id: self.run_id,
            stage: self.stage,
            research: self.research.clone(),
            outline_titles: self.outline_titles.clone(),
            section_progress: self.section_progress.clone(),
            final_content: self.final_content.clone(),
            show_full_post: self.show_full_post,
            saved_artifacts: self.saved_artifacts.clone(),
            last_error: self.last_error.clone(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn credential(&self) -> CredentialStatus {
        self.credential
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn final_content(&self) -> Option<&str> {
        self.final_content.as_deref()
    }

    pub fn current_topic(&self) -> &str {
        self.topic_source.topic()
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Hands out the pending notice once; the shell prints it and forgets it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            text: text.into(),
        });
        self.mark_dirty();
    }

    pub(crate) fn set_topic_source(&mut self, source: TopicSource) {
        self.topic_source = source;
        self.notice = None;
        self.mark_dirty();
    }

    pub(crate) fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
        self.notice = None;
        self.mark_dirty();
    }

    /// Resets per-run data and returns the id of the new run.
    pub(crate) fn start_run(&mut self) -> RunId {
        self.run_id += 1;
        self.session = SessionState::Running;
        self.stage = Some(Stage::Research);
        self.research = None;
        self.outline_titles.clear();
        self.section_progress = None;
        self.final_content = None;
        self.show_full_post = false;
        self.saved_artifacts.clear();
        self.last_error = None;
        self.notice = None;
        self.mark_dirty();
        self.run_id
    }

    pub(crate) fn is_current_run(&self, run_id: RunId) -> bool {
        self.session == SessionState::Running && self.run_id == run_id
    }

    pub(crate) fn apply_stage(&mut self, stage: Stage) {
        self.stage = Some(stage);
        self.mark_dirty();
    }

    pub(crate) fn apply_research(&mut self, keywords: Vec<String>, sources: Vec<String>) {
        self.research = Some(ResearchView { keywords, sources });
        self.mark_dirty();
    }

    pub(crate) fn apply_outline(&mut self, titles: Vec<String>) {
        if titles.is_empty() {
            self.notice = Some(Notice {
                level: NoticeLevel::Warning,
                text: "The model returned no outline headings; the post will be empty."
                    .to_string(),
            });
        }
        self.outline_titles = titles;
        self.mark_dirty();
    }

    pub(crate) fn apply_section(&mut self, completed: usize, total: usize, title: String) {
        self.section_progress = Some(SectionProgressView {
            completed,
            total,
            last_title: title,
        });
        self.mark_dirty();
    }

    pub(crate) fn complete_run(&mut self, content: String) {
        self.session = SessionState::Finished;
        self.stage = Some(Stage::Done);
        self.final_content = Some(content);
        self.mark_dirty();
    }

    pub(crate) fn fail_run(&mut self, message: String) {
        self.session = SessionState::Failed;
        self.last_error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn show_full_post(&mut self) {
        self.show_full_post = true;
        self.mark_dirty();
    }

    pub(crate) fn record_artifact(&mut self, format: OutputFormat, path: String) {
        self.saved_artifacts
            .retain(|artifact| artifact.format != format);
        self.notice = Some(Notice {
            level: NoticeLevel::Info,
            text: format!("Saved {format} export to {path}"),
        });
        self.saved_artifacts.push(SavedArtifactView { format, path });
        self.mark_dirty();
    }
}
