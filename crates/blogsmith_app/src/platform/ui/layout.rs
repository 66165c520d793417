use blogsmith_core::{AppViewModel, CredentialStatus, TopicSource, TRENDING_TOPICS};

use super::constants::*;

/// Banner, credential status and command list printed at startup.
pub fn initial_lines(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![APP_TITLE.to_string(), String::new()];
    match view.credential {
        CredentialStatus::Ready => lines.push("Inference credential found.".to_string()),
        CredentialStatus::Missing => lines.push(
            "HUGGINGFACEHUB_API_TOKEN is not set; generation is disabled until it is added to the environment or a .env file."
                .to_string(),
        ),
    }
    lines.push(String::new());
    lines.extend(topic_lines(&view.topic_source));
    lines.push(String::new());
    lines.extend(help_lines());
    lines.push(String::new());
    lines.push(format!(
        "Topic: {} | Output format: {}",
        view.topic, view.output_format
    ));
    lines
}

pub fn help_lines() -> Vec<String> {
    let mut lines = vec!["Commands:".to_string()];
    lines.extend(HELP_LINES.iter().map(|line| line.to_string()));
    lines
}

/// Numbered trending topics with the active one marked.
pub fn topic_lines(current: &TopicSource) -> Vec<String> {
    let mut lines = vec!["Trending topics:".to_string()];
    for (index, topic) in TRENDING_TOPICS.iter().enumerate() {
        let marker = if *current == TopicSource::Trending(index) {
            '*'
        } else {
            ' '
        };
        lines.push(format!(" {marker}{}. {topic}", index + 1));
    }
    if let TopicSource::Custom(text) = current {
        lines.push(format!(" *   custom: {text}"));
    }
    lines
}
