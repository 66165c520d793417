//! Blogsmith core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{GenerationOutcome, Msg};
pub use state::{
    AppState, CredentialStatus, OutputFormat, RunId, SessionState, Stage, TopicSource,
    DEFAULT_FILE_STEM, TRENDING_TOPICS,
};
pub use update::update;
pub use view_model::{
    AppViewModel, Notice, NoticeLevel, ResearchView, SavedArtifactView, SectionProgressView,
};
