use std::fs;

use blogsmith_engine::{export, save_artifact, ExportError, ExportFormat};
use pretty_assertions::assert_eq;
use scraper::{Html, Selector};

const POST: &str = "\
# Hybrid Work Best Practices

**Meta description:** How HR teams keep hybrid work fair.

## Setting Expectations

Agree on *core hours* and read [SHRM](https://www.shrm.org) guidance.

- Shared calendars
- Written norms
";

#[test]
fn markdown_export_is_the_text_itself() {
    let artifact = export("# Hi", ExportFormat::Markdown).unwrap();
    assert_eq!(artifact.bytes, b"# Hi");
    assert_eq!(artifact.mime_type, "text/markdown");
    assert_eq!(artifact.extension, "md");
}

#[test]
fn html_export_keeps_structure() {
    let artifact = export(POST, ExportFormat::Html).unwrap();
    let html = String::from_utf8(artifact.bytes).unwrap();
    assert!(html.contains("<h1>Hybrid Work Best Practices</h1>"));

    let document = Html::parse_fragment(&html);
    let h2 = Selector::parse("h2").unwrap();
    let links = Selector::parse("a").unwrap();
    let items = Selector::parse("li").unwrap();
    let h2_text: Vec<String> = document
        .select(&h2)
        .map(|el| el.text().collect::<String>())
        .collect();
    assert_eq!(h2_text, vec!["Setting Expectations".to_string()]);
    assert_eq!(
        document
            .select(&links)
            .filter_map(|el| el.value().attr("href"))
            .collect::<Vec<_>>(),
        vec!["https://www.shrm.org"]
    );
    assert_eq!(document.select(&items).count(), 2);
}

#[test]
fn text_export_has_no_markdown_syntax() {
    let artifact = export(POST, ExportFormat::Text).unwrap();
    let text = String::from_utf8(artifact.bytes).unwrap();
    assert!(text.starts_with("Hybrid Work Best Practices\n\n"));
    assert!(text.contains("Agree on core hours and read SHRM guidance."));
    assert!(text.contains("- Written norms"));
    for marker in ["#", "**", "](", "*core"] {
        assert!(!text.contains(marker), "found {marker:?} in {text:?}");
    }
    assert_eq!(artifact.mime_type, "text/plain");
}

#[test]
fn pdf_export_produces_a_document() {
    let artifact = export(POST, ExportFormat::Pdf).unwrap();
    assert!(artifact.bytes.starts_with(b"%PDF"));
    assert_eq!(artifact.mime_type, "application/pdf");

    let blank = export("", ExportFormat::Pdf).unwrap();
    assert!(blank.bytes.starts_with(b"%PDF"));
}

#[test]
fn saved_artifacts_use_the_stem_and_extension() {
    let temp = tempfile::TempDir::new().unwrap();
    let dir = temp.path().join("output");

    for format in ExportFormat::ALL {
        let artifact = export(POST, format).unwrap();
        let path = save_artifact(&dir, "hr_blog", &artifact).unwrap();
        assert_eq!(path, dir.join(format!("hr_blog.{}", format.extension())));
        assert_eq!(fs::read(&path).unwrap(), artifact.bytes);
    }
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 4);
}

#[test]
fn unusable_file_stems_are_rejected() {
    let temp = tempfile::TempDir::new().unwrap();
    let artifact = export("# Hi", ExportFormat::Markdown).unwrap();

    for stem in ["", "../escape", "with space"] {
        let err = save_artifact(temp.path(), stem, &artifact).unwrap_err();
        assert!(matches!(err, ExportError::InvalidFileStem(_)), "{stem:?}");
    }
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}
