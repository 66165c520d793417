#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use blogsmith_engine::{
    EngineEvent, InferenceClient, InferenceError, PipelineProgress, PipelineSettings,
    ProgressSink,
};

pub const WELLNESS_OUTLINE: &str = "\
Here is an outline for your post.

## Introduction
### Why wellness matters now
## Building a Program
### Physical health
### Mental health
## Measuring Impact
### Participation
### Return on investment
## Conclusion
";

/// Answers each stage prompt with canned text derived from the prompt itself.
pub struct ScriptedClient {
    outline: String,
    calls: Mutex<Vec<String>>,
    stagger_sections: bool,
    fail_stage: Option<&'static str>,
}

impl ScriptedClient {
    pub fn new(outline: &str) -> Self {
        Self {
            outline: outline.to_string(),
            calls: Mutex::new(Vec::new()),
            stagger_sections: false,
            fail_stage: None,
        }
    }

    /// Earlier sections answer more slowly than later ones.
    pub fn staggered(mut self) -> Self {
        self.stagger_sections = true;
        self
    }

    /// Fails every prompt that starts with `prefix`.
    pub fn failing_on(mut self, prefix: &'static str) -> Self {
        self.fail_stage = Some(prefix);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn section_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|p| p.starts_with("Write a detailed blog section about: "))
            .collect()
    }
}

#[async_trait::async_trait]
impl InferenceClient for ScriptedClient {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(prompt.to_string());
            calls.len()
        };

        if let Some(prefix) = self.fail_stage {
            if prompt.starts_with(prefix) {
                return Err(InferenceError {
                    kind: blogsmith_engine::InferenceFailureKind::RateLimited,
                    message: "slow down".to_string(),
                });
            }
        }

        if prompt.starts_with("Create a detailed blog post outline") {
            return Ok(self.outline.clone());
        }
        if let Some(rest) = prompt.strip_prefix("Write a detailed blog section about: ") {
            let title = rest.lines().next().unwrap_or_default().to_string();
            if self.stagger_sections {
                let delay = 120u64.saturating_sub(index as u64 * 20);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            return Ok(format!("Body for *{title}* with a [source](https://hbr.org)."));
        }
        if prompt.starts_with("Optimize this blog content") {
            let content = between(prompt, "Original content:\n", "\n\nImprovements needed:");
            return Ok(format!(
                "**Meta description:** A practical guide.\n\n{content}"
            ));
        }
        if prompt.starts_with("Review and improve") {
            let content = between(
                prompt,
                "Review and improve this blog content:\n\n",
                "\n\nCheck for:",
            );
            return Ok(content.to_string());
        }
        Ok(String::new())
    }
}

fn between<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
    let from = text.find(start).map(|i| i + start.len()).unwrap_or(0);
    let to = text[from..].find(end).map(|i| from + i).unwrap_or(text.len());
    &text[from..to]
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    pub fn section_titles(&self) -> Vec<(usize, usize, String)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Progress(PipelineProgress::SectionWritten {
                    completed,
                    total,
                    title,
                    ..
                }) => Some((*completed, *total, title.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn stages(&self) -> Vec<blogsmith_engine::Stage> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Progress(PipelineProgress::StageStarted { stage, .. }) => {
                    Some(*stage)
                }
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn fast_settings(workers: usize) -> PipelineSettings {
    PipelineSettings {
        section_pause: Duration::ZERO,
        section_workers: workers,
    }
}
