use blogsmith_core::{AppViewModel, Notice, NoticeLevel, SessionState, Stage};

/// Lines describing what changed between two snapshots of the view.
///
/// The terminal is append-only, so only new information is printed: stage
/// transitions, research and outline results, section progress and the
/// finished post.
pub fn render(prev: &AppViewModel, next: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if prev.topic_source != next.topic_source {
        lines.push(format!("Topic: {}", next.topic));
    }
    if prev.output_format != next.output_format {
        lines.push(format!("Output format: {}", next.output_format));
    }

    let new_run = next.run_id != prev.run_id && next.session == SessionState::Running;
    if new_run {
        lines.push(format!("Generating a blog post about '{}'...", next.topic));
    }

    if next.stage != prev.stage || new_run {
        if let Some(label) = next.stage.and_then(stage_label) {
            lines.push(format!("[{}/5] {label}", stage_number(next.stage)));
        }
    }

    if next.research != prev.research {
        if let Some(research) = &next.research {
            lines.push(format!("  Keywords: {}", research.keywords.join(", ")));
            lines.push(format!("  Sources: {}", research.sources.join(", ")));
        }
    }

    if next.outline_titles != prev.outline_titles && !next.outline_titles.is_empty() {
        lines.push(format!("  Outline ({} sections):", next.outline_titles.len()));
        for (index, title) in next.outline_titles.iter().enumerate() {
            lines.push(format!("    {}. {title}", index + 1));
        }
    }

    if next.section_progress != prev.section_progress {
        if let Some(progress) = &next.section_progress {
            lines.push(format!(
                "  Wrote section {}/{}: {}",
                progress.completed, progress.total, progress.last_title
            ));
        }
    }

    if next.session != prev.session {
        match next.session {
            SessionState::Finished => lines.push("Blog post generated successfully!".to_string()),
            SessionState::Failed => lines.push(format!(
                "Generation failed: {}",
                next.last_error.as_deref().unwrap_or("unknown error")
            )),
            SessionState::Idle | SessionState::Running => {}
        }
    }

    let post_changed = next.final_content != prev.final_content
        || (next.show_full_post && !prev.show_full_post);
    if post_changed {
        if let Some((text, truncated)) = next.post_excerpt() {
            lines.push("----- blog post -----".to_string());
            lines.extend(text.lines().map(str::to_string));
            if truncated {
                lines.push("... (type 'show' for the full post)".to_string());
            }
            lines.push("---------------------".to_string());
        }
    }

    lines
}

pub fn notice_line(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!("[{tag}] {}", notice.text)
}

fn stage_label(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::Research => Some("Researching topic..."),
        Stage::Outline => Some("Creating outline..."),
        Stage::Sections => Some("Writing sections..."),
        Stage::Optimize => Some("Optimizing for SEO..."),
        Stage::Review => Some("Reviewing content..."),
        Stage::Done => None,
    }
}

fn stage_number(stage: Option<Stage>) -> usize {
    match stage {
        Some(Stage::Research) | None => 1,
        Some(Stage::Outline) => 2,
        Some(Stage::Sections) => 3,
        Some(Stage::Optimize) => 4,
        Some(Stage::Review) | Some(Stage::Done) => 5,
    }
}
