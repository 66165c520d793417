use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_error, engine_info, engine_warn};

use crate::{
    export, save_artifact, ChannelProgressSink, EngineEvent, ExportError, ExportFormat,
    InferenceClient, Pipeline, PipelineSettings, RunId,
};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub pipeline: PipelineSettings,
    pub output_dir: PathBuf,
}

impl EngineSettings {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            pipeline: PipelineSettings::default(),
            output_dir,
        }
    }
}

enum EngineCommand {
    Generate {
        run_id: RunId,
        topic: String,
    },
    Export {
        format: ExportFormat,
        content: String,
        file_stem: String,
    },
}

/// Owns a background thread with a tokio runtime; commands go in, events come out.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(
        client: Arc<dyn InferenceClient>,
        settings: EngineSettings,
    ) -> Result<Self, std::io::Error> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("blogsmith-engine")
            .build()?;
        let settings = Arc::new(settings);

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let settings = settings.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(client, &settings, command, event_tx).await;
                });
            }
            engine_info!("engine command channel closed");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn generate(&self, run_id: RunId, topic: impl Into<String>) {
        self.send(EngineCommand::Generate {
            run_id,
            topic: topic.into(),
        });
    }

    pub fn export(
        &self,
        format: ExportFormat,
        content: impl Into<String>,
        file_stem: impl Into<String>,
    ) {
        self.send(EngineCommand::Export {
            format,
            content: content.into(),
            file_stem: file_stem.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_error!("engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    client: Arc<dyn InferenceClient>,
    settings: &EngineSettings,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Generate { run_id, topic } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let pipeline = Pipeline::new(client.as_ref(), settings.pipeline.clone());
            let result = pipeline.run(run_id, &topic, &sink).await;
            if let Err(err) = &result {
                engine_warn!("run {} failed: {}", run_id, err);
            }
            let _ = event_tx.send(EngineEvent::GenerationCompleted { run_id, result });
        }
        EngineCommand::Export {
            format,
            content,
            file_stem,
        } => {
            let output_dir = settings.output_dir.clone();
            let result = tokio::task::spawn_blocking(move || {
                let artifact = export(&content, format)?;
                save_artifact(&output_dir, &file_stem, &artifact)
            })
            .await
            .unwrap_or_else(|join_err| Err(ExportError::Interrupted(join_err.to_string())));
            match &result {
                Ok(path) => engine_info!("saved {} export to {:?}", format, path),
                Err(err) => engine_warn!("{} export failed: {}", format, err),
            }
            let _ = event_tx.send(EngineEvent::ExportCompleted { format, result });
        }
    }
}
