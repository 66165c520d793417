use std::fmt;

use thiserror::Error;

pub const DEFAULT_KEYWORDS: [&str; 3] = ["remote work", "hybrid work", "HR policies"];

pub const DEFAULT_SOURCES: [&str; 3] = [
    "https://www.shrm.org",
    "https://hbr.org",
    "https://www.gartner.com",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TopicError {
    #[error("topic must not be empty")]
    Empty,
}

/// A non-empty, trimmed blog topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic(String);

impl Topic {
    pub fn new(raw: &str) -> Result<Self, TopicError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TopicError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchData {
    pub topic: String,
    pub keywords: Vec<String>,
    pub sources: Vec<String>,
}

impl ResearchData {
    pub fn keyword_list(&self) -> String {
        self.keywords.join(", ")
    }
}

/// Stand-in for real research: the same keywords and sources for every topic.
pub fn research_topic(topic: &Topic) -> ResearchData {
    ResearchData {
        topic: topic.as_str().to_string(),
        keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
    }
}
