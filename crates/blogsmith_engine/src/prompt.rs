use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("template '{template}' needs a value for '{{{name}}}'")]
    MissingVariable { template: &'static str, name: String },
}

/// A fixed prompt text with `{name}` placeholders.
///
/// Braces that do not enclose an identifier are literal text. Substitution is
/// a single pass, so placeholder-like text inside a value is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    name: &'static str,
    text: &'static str,
}

impl PromptTemplate {
    pub const fn new(name: &'static str, text: &'static str) -> Self {
        Self { name, text }
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        for segment in segments(self.text) {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn render(&self, vars: &[(&str, &str)]) -> Result<String, PromptError> {
        let mut rendered = String::with_capacity(self.text.len());
        for segment in segments(self.text) {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder(name) => {
                    let value = vars
                        .iter()
                        .find(|(key, _)| *key == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| PromptError::MissingVariable {
                            template: self.name,
                            name: name.to_string(),
                        })?;
                    rendered.push_str(value);
                }
            }
        }
        Ok(rendered)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;
    while let Some(offset) = text[cursor..].find('{') {
        let open = cursor + offset;
        let candidate = text[open + 1..]
            .find('}')
            .map(|len| &text[open + 1..open + 1 + len])
            .filter(|name| is_identifier(name));
        match candidate {
            Some(name) => {
                if literal_start < open {
                    out.push(Segment::Literal(&text[literal_start..open]));
                }
                out.push(Segment::Placeholder(name));
                cursor = open + name.len() + 2;
                literal_start = cursor;
            }
            None => cursor = open + 1,
        }
    }
    if literal_start < text.len() {
        out.push(Segment::Literal(&text[literal_start..]));
    }
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

pub const OUTLINE_PROMPT: PromptTemplate = PromptTemplate::new(
    "outline",
    "Create a detailed blog post outline about {topic} focusing on these keywords: {keywords}.
Include:
- Introduction
- 3-4 main sections with 2-3 sub-sections each
- Conclusion
- Call to action

Format as markdown headings (## for sections, ### for sub-sections).
",
);

pub const SECTION_PROMPT: PromptTemplate = PromptTemplate::new(
    "section",
    "Write a detailed blog section about: {title}

Cover these sub-topics:
{subsections}

Requirements:
- 300-500 words
- Professional but engaging tone
- Use markdown formatting
- Include relevant examples or statistics
",
);

pub const SEO_PROMPT: PromptTemplate = PromptTemplate::new(
    "seo",
    "Optimize this blog content for SEO focusing on: {keywords}

Original content:
{content}

Improvements needed:
1. Natural keyword integration
2. Readability improvements
3. Meta description
4. Heading structure
5. Internal linking suggestions

Return optimized content in markdown.
",
);

pub const REVIEW_PROMPT: PromptTemplate = PromptTemplate::new(
    "review",
    "Review and improve this blog content:

{content}

Check for:
1. Grammar and spelling
2. Logical flow
3. Consistency
4. Tone appropriateness
5. Clarity

Return improved content.
",
);
