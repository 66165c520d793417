use blogsmith_core::{Msg, OutputFormat, TRENDING_TOPICS};

use super::constants::*;

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(Msg),
    ListTopics,
    Help,
    Quit,
}

/// Parses a shell line. Blank lines give `Ok(None)`; errors are user-facing text.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    let command = match keyword.to_ascii_lowercase().as_str() {
        CMD_TOPICS => Command::ListTopics,
        CMD_TOPIC => Command::Send(Msg::TrendingTopicSelected(parse_topic_number(rest)?)),
        CMD_CUSTOM => Command::Send(Msg::CustomTopicEntered(rest.to_string())),
        CMD_FORMAT => Command::Send(Msg::OutputFormatSelected(parse_format(rest)?)),
        CMD_GENERATE => Command::Send(Msg::GenerateClicked),
        CMD_EXPORT => Command::Send(Msg::ExportClicked(parse_format(rest)?)),
        CMD_SHOW => Command::Send(Msg::ShowPostClicked),
        CMD_HELP => Command::Help,
        CMD_QUIT | CMD_EXIT => Command::Quit,
        other => return Err(format!("Unknown command '{other}'; type 'help'.")),
    };
    Ok(Some(command))
}

/// Topic numbers are shown 1-based; the message carries the 0-based index.
fn parse_topic_number(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(number) if number >= 1 => Ok(number - 1),
        _ => Err(format!(
            "Usage: topic <n> with n between 1 and {}.",
            TRENDING_TOPICS.len()
        )),
    }
}

fn parse_format(raw: &str) -> Result<OutputFormat, String> {
    if raw.is_empty() {
        return Err("Name a format: markdown, html, pdf or txt.".to_string());
    }
    raw.parse::<OutputFormat>()
}
