use super::machine::CanonicalLine;
use crate::domain::{Level, RenderError, should_emit};
use console::Style;
use serde::Deserialize;
use serde_json::Value as JsonValue;

const INDENT: &str = "  ";

/// Readable rendition of a canonical line for local development.
///
/// Works from the machine line rather than the record so both outputs show the same
/// normalized data.
#[derive(Debug, Clone, Default)]
pub struct HumanRenderer {
    colors: bool,
    cwd: Option<String>,
}

impl HumanRenderer {
    /// `cwd` is the absolute path prefix shortened to `.` in the data block.
    pub fn new(colors: bool, cwd: Option<String>) -> Self {
        Self { colors, cwd }
    }

    pub fn render(&self, machine_line: &str) -> Result<String, RenderError> {
        let line = parse_line(machine_line)?;
        let style = self.header_style(line.level.parse::<Level>().ok());

        let header = format!("\n{}: {}", line.level, line.message);
        let mut out = header
            .split('\n')
            .map(|part| match part {
                "" => String::new(),
                part => style.apply_to(part).to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n");

        if let Some(data) = line.data.as_ref().filter(|data| !is_empty(data)) {
            out.push('\n');
            out.push_str(&self.data_block(data));
        }
        Ok(out)
    }

    fn header_style(&self, level: Option<Level>) -> Style {
        let style = Style::new().force_styling(self.colors).bold();
        match level {
            Some(Level::Warn) => style.yellow(),
            Some(level) if should_emit(level, Level::Error) => style.red(),
            _ => style,
        }
    }

    fn data_block(&self, data: &JsonValue) -> String {
        let dumped = serde_yaml::to_string(data).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "yaml dump failed, falling back to json");
            serde_json::to_string_pretty(data).unwrap_or_default()
        });

        let block = dumped
            .trim()
            .lines()
            .map(|line| format!("{INDENT}{line}"))
            .collect::<Vec<_>>()
            .join("\n");

        match self.cwd.as_deref().map(|cwd| cwd.trim_end_matches('/')) {
            Some(cwd) if !cwd.is_empty() => shorten_paths(&block, cwd),
            _ => block,
        }
    }
}

// The normalizer nests deeper than serde_json's default recursion limit.
fn parse_line(machine_line: &str) -> Result<CanonicalLine, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(machine_line);
    de.disable_recursion_limit();
    let line = CanonicalLine::deserialize(&mut de)?;
    de.end()?;
    Ok(line)
}

/// Replaces `cwd` with `.` where it is a whole path prefix, not part of a longer name.
fn shorten_paths(block: &str, cwd: &str) -> String {
    let mut out = String::with_capacity(block.len());
    let mut rest = block;
    while let Some(index) = rest.find(cwd) {
        let after = &rest[index + cwd.len()..];
        out.push_str(&rest[..index]);
        if at_path_boundary(after) {
            out.push('.');
        } else {
            out.push_str(cwd);
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

fn at_path_boundary(after: &str) -> bool {
    after
        .chars()
        .next()
        .is_none_or(|c| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.')))
}

fn is_empty(data: &JsonValue) -> bool {
    match data {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64() == Some(0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(members) => members.is_empty(),
    }
}
