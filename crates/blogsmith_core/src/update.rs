use crate::{
    AppState, CredentialStatus, Effect, GenerationOutcome, Msg, NoticeLevel, SessionState,
    TopicSource, DEFAULT_FILE_STEM, TRENDING_TOPICS,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::TrendingTopicSelected(index) => {
            if index < TRENDING_TOPICS.len() {
                state.set_topic_source(TopicSource::Trending(index));
            } else {
                state.set_notice(
                    NoticeLevel::Warning,
                    format!(
                        "There is no trending topic #{}; pick 1-{}.",
                        index + 1,
                        TRENDING_TOPICS.len()
                    ),
                );
            }
            Vec::new()
        }
        Msg::CustomTopicEntered(raw) => {
            let topic = raw.trim();
            if topic.is_empty() {
                state.set_notice(NoticeLevel::Warning, "A custom topic must not be empty.");
            } else {
                state.set_topic_source(TopicSource::Custom(topic.to_string()));
            }
            Vec::new()
        }
        Msg::OutputFormatSelected(format) => {
            state.set_output_format(format);
            Vec::new()
        }
        Msg::GenerateClicked => {
            if state.credential() == CredentialStatus::Missing {
                state.set_notice(
                    NoticeLevel::Error,
                    "HUGGINGFACEHUB_API_TOKEN is not set; add it to the environment or a .env file and restart.",
                );
                return (state, Vec::new());
            }
            if state.session() == SessionState::Running {
                state.set_notice(
                    NoticeLevel::Info,
                    "A blog post is already being generated; wait for it to finish.",
                );
                return (state, Vec::new());
            }
            let topic = state.current_topic().to_string();
            let run_id = state.start_run();
            vec![Effect::RunPipeline { run_id, topic }]
        }
        Msg::ExportClicked(format) => match state.final_content().map(str::to_owned) {
            Some(content) => vec![Effect::ExportArtifact {
                format,
                content,
                file_stem: DEFAULT_FILE_STEM.to_string(),
            }],
            None => {
                state.set_notice(
                    NoticeLevel::Info,
                    "Nothing to export yet; generate a blog post first.",
                );
                Vec::new()
            }
        },
        Msg::ShowPostClicked => {
            if state.final_content().is_some() {
                state.show_full_post();
            } else {
                state.set_notice(NoticeLevel::Info, "No blog post has been generated yet.");
            }
            Vec::new()
        }
        Msg::StageStarted { run_id, stage } => {
            if state.is_current_run(run_id) {
                state.apply_stage(stage);
            }
            Vec::new()
        }
        Msg::ResearchReady {
            run_id,
            keywords,
            sources,
        } => {
            if state.is_current_run(run_id) {
                state.apply_research(keywords, sources);
            }
            Vec::new()
        }
        Msg::OutlineReady { run_id, titles } => {
            if state.is_current_run(run_id) {
                state.apply_outline(titles);
            }
            Vec::new()
        }
        Msg::SectionWritten {
            run_id,
            completed,
            total,
            title,
        } => {
            if state.is_current_run(run_id) {
                state.apply_section(completed, total, title);
            }
            Vec::new()
        }
        Msg::GenerationFinished { run_id, outcome } => {
            if !state.is_current_run(run_id) {
                return (state, Vec::new());
            }
            match outcome {
                GenerationOutcome::Completed { content } => {
                    state.complete_run(content.clone());
                    vec![Effect::ExportArtifact {
                        format: state.output_format(),
                        content,
                        file_stem: DEFAULT_FILE_STEM.to_string(),
                    }]
                }
                GenerationOutcome::Failed { message } => {
                    state.fail_run(message);
                    Vec::new()
                }
            }
        }
        Msg::ArtifactSaved { format, path } => {
            state.record_artifact(format, path);
            Vec::new()
        }
        Msg::ExportFailed { format, message } => {
            state.set_notice(
                NoticeLevel::Error,
                format!("Could not export {format}: {message}"),
            );
            Vec::new()
        }
    };

    (state, effects)
}
