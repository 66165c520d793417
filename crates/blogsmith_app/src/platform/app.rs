use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use blogsmith_core::{update, AppState, AppViewModel, CredentialStatus, Effect, Msg, SessionState};
use blogsmith_engine::{ApiToken, HuggingFaceClient, InferenceSettings, PipelineSettings};
use engine_logging::{engine_info, engine_warn};
use log::LevelFilter;

use super::effects::EffectRunner;
use super::ui;
use super::ui::input::Command;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// `file` (default), `terminal` or `both`.
const LOG_DESTINATION_ENV_VAR: &str = "BLOGSMITH_LOG";

enum InputLine {
    Line(String),
    Closed,
}

pub fn run_app() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| engine_logging::parse_level(&value))
        .unwrap_or(LevelFilter::Info);
    let destination = std::env::var(LOG_DESTINATION_ENV_VAR)
        .ok()
        .and_then(|value| engine_logging::parse_destination(&value))
        .unwrap_or_default();
    engine_logging::initialize(destination, level);

    let lookup = |name: &str| std::env::var(name).ok();
    let inference = InferenceSettings::from_lookup(lookup).context("reading inference settings")?;
    let pipeline = PipelineSettings::from_lookup(lookup).context("reading pipeline settings")?;
    let output_dir = std::env::current_dir()
        .context("resolving the working directory")?
        .join("output");

    let runner = match ApiToken::from_lookup(lookup) {
        Ok(token) => {
            let client =
                HuggingFaceClient::new(inference, token).context("building inference client")?;
            engine_info!("Inference endpoint {}", client.endpoint());
            let runner = EffectRunner::new(Arc::new(client), pipeline, output_dir)
                .context("starting the engine")?;
            Some(runner)
        }
        Err(err) => {
            engine_warn!("{}", err);
            None
        }
    };
    let credential = if runner.is_some() {
        CredentialStatus::Ready
    } else {
        CredentialStatus::Missing
    };

    let mut shell = Shell::new(AppState::with_credential(credential), runner);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in ui::layout::initial_lines(&shell.last_view) {
        writeln!(out, "{line}")?;
    }
    shell.state.consume_dirty();
    write!(out, "{}", ui::constants::PROMPT)?;
    out.flush()?;

    let input_rx = spawn_input_reader();
    let mut input_open = true;
    loop {
        match input_rx.recv_timeout(POLL_INTERVAL) {
            Ok(InputLine::Line(line)) => {
                if !shell.handle_line(&line, &mut out)? {
                    break;
                }
                write!(out, "{}", ui::constants::PROMPT)?;
                out.flush()?;
            }
            Ok(InputLine::Closed) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                input_open = false;
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }

        for msg in shell.pending_engine_msgs() {
            shell.dispatch(msg, &mut out)?;
        }
        out.flush()?;

        if !input_open {
            if shell.is_idle() {
                break;
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    engine_info!("Shell closed");
    Ok(())
}

fn spawn_input_reader() -> mpsc::Receiver<InputLine> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(InputLine::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    engine_warn!("Reading input failed: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(InputLine::Closed);
    });
    rx
}

/// Owns the state and feeds it messages, the way the UI event handler does
/// for a window.
struct Shell {
    state: AppState,
    last_view: AppViewModel,
    runner: Option<EffectRunner>,
    pending_exports: usize,
}

impl Shell {
    fn new(state: AppState, runner: Option<EffectRunner>) -> Self {
        let last_view = state.view();
        Self {
            state,
            last_view,
            runner,
            pending_exports: 0,
        }
    }

    /// Returns `false` when the user asked to leave.
    fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        match ui::input::parse_command(line) {
            Ok(Some(Command::Send(msg))) => self.dispatch(msg, out)?,
            Ok(Some(Command::ListTopics)) => {
                for line in ui::layout::topic_lines(&self.last_view.topic_source) {
                    writeln!(out, "{line}")?;
                }
            }
            Ok(Some(Command::Help)) => {
                for line in ui::layout::help_lines() {
                    writeln!(out, "{line}")?;
                }
            }
            Ok(Some(Command::Quit)) => return Ok(false),
            Ok(None) => {}
            Err(message) => writeln!(out, "{message}")?,
        }
        Ok(true)
    }

    fn dispatch(&mut self, msg: Msg, out: &mut impl Write) -> io::Result<()> {
        if matches!(msg, Msg::ArtifactSaved { .. } | Msg::ExportFailed { .. }) {
            self.pending_exports = self.pending_exports.saturating_sub(1);
        }

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            let view = state.view();
            for line in ui::render::render(&self.last_view, &view) {
                writeln!(out, "{line}")?;
            }
            if let Some(notice) = state.take_notice() {
                writeln!(out, "{}", ui::render::notice_line(&notice))?;
            }
            self.last_view = state.view();
        }
        self.state = state;
        self.run_effects(effects);
        Ok(())
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        if effects.is_empty() {
            return;
        }
        let Some(runner) = &self.runner else {
            engine_warn!("Dropping {} effects; no engine is running", effects.len());
            return;
        };
        self.pending_exports += effects
            .iter()
            .filter(|effect| matches!(effect, Effect::ExportArtifact { .. }))
            .count();
        runner.enqueue(effects);
    }

    fn pending_engine_msgs(&self) -> Vec<Msg> {
        self.runner
            .as_ref()
            .map(EffectRunner::pump_events)
            .unwrap_or_default()
    }

    /// Nothing is generating and every requested export has been reported.
    fn is_idle(&self) -> bool {
        self.state.session() != SessionState::Running && self.pending_exports == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    use blogsmith_core::GenerationOutcome;
    use blogsmith_engine::{InferenceClient, InferenceError};

    #[derive(Default)]
    struct CountingClient {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl InferenceClient for CountingClient {
        async fn generate(&self, _prompt: &str) -> Result<String, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("## Heading".to_string())
        }
    }

    fn counting_runner(client: Arc<CountingClient>, output_dir: std::path::PathBuf) -> EffectRunner {
        let pipeline = PipelineSettings {
            section_pause: Duration::ZERO,
            section_workers: 1,
        };
        EffectRunner::new(client, pipeline, output_dir).unwrap()
    }

    fn run(shell: &mut Shell, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            assert!(shell.handle_line(line, &mut out).unwrap());
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn missing_credential_refuses_generation() {
        let mut shell = Shell::new(AppState::with_credential(CredentialStatus::Missing), None);
        let output = run(&mut shell, &["generate"]);
        assert!(output.starts_with("[error] HUGGINGFACEHUB_API_TOKEN is not set"));
        assert_eq!(shell.state.session(), SessionState::Idle);
        assert!(shell.is_idle());
    }

    #[test]
    fn missing_credential_never_reaches_the_model() {
        let temp = tempfile::TempDir::new().unwrap();
        let client = Arc::new(CountingClient::default());
        let runner = counting_runner(client.clone(), temp.path().to_path_buf());
        let mut shell = Shell::new(
            AppState::with_credential(CredentialStatus::Missing),
            Some(runner),
        );

        run(&mut shell, &["topic 3", "generate", "generate"]);
        thread::sleep(Duration::from_millis(200));
        let mut out = Vec::new();
        for msg in shell.pending_engine_msgs() {
            shell.dispatch(msg, &mut out).unwrap();
        }

        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
        assert_eq!(shell.state.session(), SessionState::Idle);
        assert!(shell.is_idle());
    }

    #[test]
    fn ready_credential_runs_the_pipeline_through_the_engine() {
        let temp = tempfile::TempDir::new().unwrap();
        let client = Arc::new(CountingClient::default());
        let runner = counting_runner(client.clone(), temp.path().to_path_buf());
        let mut shell = Shell::new(AppState::with_credential(CredentialStatus::Ready), Some(runner));

        run(&mut shell, &["generate"]);
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut out = Vec::new();
        while !shell.is_idle() && Instant::now() < deadline {
            for msg in shell.pending_engine_msgs() {
                shell.dispatch(msg, &mut out).unwrap();
            }
            thread::sleep(Duration::from_millis(10));
        }

        // outline, one section, SEO, review
        assert_eq!(client.calls.load(Ordering::SeqCst), 4);
        assert_eq!(shell.state.session(), SessionState::Finished);
        assert!(temp.path().join("hr_blog.md").exists());
    }

    #[test]
    fn topic_and_format_changes_are_echoed() {
        let mut shell = Shell::new(AppState::new(), None);
        let output = run(&mut shell, &["topic 5", "format html", "custom   "]);
        assert_eq!(
            output,
            "Topic: Hybrid Work Best Practices\nOutput format: html\n[warning] A custom topic must not be empty.\n"
        );
    }

    #[test]
    fn unknown_commands_and_quit() {
        let mut shell = Shell::new(AppState::new(), None);
        let output = run(&mut shell, &["dance"]);
        assert!(output.contains("Unknown command 'dance'"));
        let mut out = Vec::new();
        assert!(!shell.handle_line("quit", &mut out).unwrap());
    }

    #[test]
    fn finished_post_is_printed_and_saved_notice_follows() {
        let mut shell = Shell::new(AppState::new(), None);
        let mut out = Vec::new();
        shell.dispatch(Msg::GenerateClicked, &mut out).unwrap();
        shell
            .dispatch(
                Msg::GenerationFinished {
                    run_id: 1,
                    outcome: GenerationOutcome::Completed {
                        content: "## Intro\n\nShort post.".to_string(),
                    },
                },
                &mut out,
            )
            .unwrap();
        shell
            .dispatch(
                Msg::ArtifactSaved {
                    format: blogsmith_core::OutputFormat::Markdown,
                    path: "output/hr_blog.md".to_string(),
                },
                &mut out,
            )
            .unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Blog post generated successfully!\n----- blog post -----\n## Intro\n\nShort post.\n"));
        assert!(output.ends_with("[info] Saved markdown export to output/hr_blog.md\n"));
    }
}
