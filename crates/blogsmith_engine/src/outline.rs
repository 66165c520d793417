//! Outline parsing for model output.
//!
//! The model is asked for `##` section headings with `###` sub-headings. The
//! parser is a two-state machine over trimmed lines:
//!
//! - `BeforeSection`: `## title` opens a section; everything else, including
//!   `### ` sub-headings with no parent, is dropped.
//! - `InSection`: `## title` closes the current section and opens the next;
//!   `### sub` appends a subsection; other lines are ignored.
//!
//! A heading with an empty title is ignored. Parsing never fails; output with
//! no usable headings yields an empty outline.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineSection {
    pub title: String,
    pub subsections: Vec<String>,
}

impl OutlineSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subsections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outline {
    pub sections: Vec<OutlineSection>,
}

enum ParseState {
    BeforeSection,
    InSection(OutlineSection),
}

enum Line<'a> {
    Section(&'a str),
    Subsection(&'a str),
    Other,
}

impl Outline {
    pub fn parse(text: &str) -> Self {
        let mut sections = Vec::new();
        let mut state = ParseState::BeforeSection;

        for raw in text.lines() {
            state = match (state, classify(raw.trim())) {
                (ParseState::BeforeSection, Line::Section(title)) => {
                    ParseState::InSection(OutlineSection::new(title))
                }
                (ParseState::BeforeSection, _) => ParseState::BeforeSection,
                (ParseState::InSection(current), Line::Section(title)) => {
                    sections.push(current);
                    ParseState::InSection(OutlineSection::new(title))
                }
                (ParseState::InSection(mut current), Line::Subsection(sub)) => {
                    current.subsections.push(sub.to_string());
                    ParseState::InSection(current)
                }
                (ParseState::InSection(current), Line::Other) => ParseState::InSection(current),
            };
        }

        if let ParseState::InSection(current) = state {
            sections.push(current);
        }
        Self { sections }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn titles(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.title.clone()).collect()
    }
}

fn classify(line: &str) -> Line<'_> {
    if let Some(title) = line.strip_prefix("## ") {
        let title = title.trim();
        if !title.is_empty() {
            return Line::Section(title);
        }
    } else if let Some(sub) = line.strip_prefix("### ") {
        let sub = sub.trim();
        if !sub.is_empty() {
            return Line::Subsection(sub);
        }
    }
    Line::Other
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn section(title: &str, subs: &[&str]) -> OutlineSection {
        OutlineSection {
            title: title.to_string(),
            subsections: subs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn parses_sections_and_subsections_in_order() {
        let outline = Outline::parse("## A\n### A1\n### A2\n## B\n### B1");
        assert_eq!(
            outline.sections,
            vec![section("A", &["A1", "A2"]), section("B", &["B1"])]
        );
    }

    #[test]
    fn tolerates_indentation_and_prose_between_headings() {
        let text = "Here is your outline:\n\n   ## Introduction  \nSome words\n  ### Why it matters\n\n## Conclusion\n";
        let outline = Outline::parse(text);
        assert_eq!(
            outline.sections,
            vec![
                section("Introduction", &["Why it matters"]),
                section("Conclusion", &[])
            ]
        );
    }

    #[test]
    fn orphan_subsections_are_dropped() {
        let outline = Outline::parse("### lost\n### also lost\n## Kept\n### found");
        assert_eq!(outline.sections, vec![section("Kept", &["found"])]);
    }

    #[test]
    fn output_without_headings_is_empty() {
        assert!(Outline::parse("").is_empty());
        assert!(Outline::parse("1. Intro\n2. Body\n# Title only").is_empty());
        assert!(Outline::parse("##\n##   \n###").is_empty());
    }

    #[test]
    fn deeper_headings_are_ignored() {
        let outline = Outline::parse("## A\n#### deep\n### A1");
        assert_eq!(outline.sections, vec![section("A", &["A1"])]);
        assert_eq!(outline.titles(), vec!["A".to_string()]);
    }
}
