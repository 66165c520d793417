use futures_util::StreamExt;

use engine_logging::{engine_debug, engine_warn};

use crate::pipeline::PipelineError;
use crate::{
    InferenceClient, Outline, OutlineSection, PipelineSettings, ResearchData, Stage,
    OUTLINE_PROMPT, REVIEW_PROMPT, SECTION_PROMPT, SEO_PROMPT,
};

pub async fn create_outline(
    client: &dyn InferenceClient,
    research: &ResearchData,
) -> Result<Outline, PipelineError> {
    let keywords = research.keyword_list();
    let prompt = OUTLINE_PROMPT
        .render(&[("topic", research.topic.as_str()), ("keywords", keywords.as_str())])
        .map_err(|source| PipelineError::Prompt {
            stage: Stage::Outline,
            source,
        })?;
    let raw = client
        .generate(&prompt)
        .await
        .map_err(|source| PipelineError::Inference {
            stage: Stage::Outline,
            source,
        })?;

    let outline = Outline::parse(&raw);
    if outline.is_empty() {
        engine_warn!(
            "outline response for '{}' had no '## ' headings ({} chars); continuing with an empty outline",
            research.topic,
            raw.len()
        );
    }
    Ok(outline)
}

/// Writes one section and returns it as a `## title` markdown block.
pub async fn generate_section(
    client: &dyn InferenceClient,
    section: &OutlineSection,
) -> Result<String, PipelineError> {
    let subsections = section.subsections.join("\n- ");
    let prompt = SECTION_PROMPT
        .render(&[("title", section.title.as_str()), ("subsections", subsections.as_str())])
        .map_err(|source| PipelineError::Prompt {
            stage: Stage::Sections,
            source,
        })?;
    let body = client
        .generate(&prompt)
        .await
        .map_err(|source| PipelineError::Inference {
            stage: Stage::Sections,
            source,
        })?;
    Ok(format!("## {}\n\n{}", section.title, body))
}

/// Writes every section with at most `section_workers` calls in flight and
/// joins the blocks in outline order.
///
/// `on_section` sees `(completed, total, section)` in outline order.
pub async fn generate_full_content(
    client: &dyn InferenceClient,
    outline: &Outline,
    settings: &PipelineSettings,
    on_section: &mut (dyn FnMut(usize, usize, &OutlineSection) + Send),
) -> Result<String, PipelineError> {
    let total = outline.len();
    let pause = settings.section_pause;
    let workers = settings.section_workers.max(1);

    let sections = &outline.sections;

    // Index items: a `&OutlineSection` item makes the closure higher-ranked
    // and the run future fails the `Send` bound of `Runtime::spawn`.
    let mut blocks = futures_util::stream::iter(0..total)
        .map(move |index| async move {
            let block = generate_section(client, &sections[index]).await?;
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
            Ok::<_, PipelineError>((index, block))
        })
        .buffered(workers);

    let mut content = Vec::with_capacity(total);
    while let Some(result) = blocks.next().await {
        let (index, block) = result?;
        let section = &sections[index];
        content.push(block);
        engine_debug!("section {}/{} written: {}", content.len(), total, section.title);
        on_section(content.len(), total, section);
    }
    Ok(content.join("\n\n"))
}

pub async fn optimize_content(
    client: &dyn InferenceClient,
    content: &str,
    keywords: &[String],
) -> Result<String, PipelineError> {
    let keywords = keywords.join(", ");
    let prompt = SEO_PROMPT
        .render(&[("content", content), ("keywords", keywords.as_str())])
        .map_err(|source| PipelineError::Prompt {
            stage: Stage::Optimize,
            source,
        })?;
    client
        .generate(&prompt)
        .await
        .map_err(|source| PipelineError::Inference {
            stage: Stage::Optimize,
            source,
        })
}

pub async fn review_content(
    client: &dyn InferenceClient,
    content: &str,
) -> Result<String, PipelineError> {
    let prompt = REVIEW_PROMPT
        .render(&[("content", content)])
        .map_err(|source| PipelineError::Prompt {
            stage: Stage::Review,
            source,
        })?;
    client
        .generate(&prompt)
        .await
        .map_err(|source| PipelineError::Inference {
            stage: Stage::Review,
            source,
        })
}
