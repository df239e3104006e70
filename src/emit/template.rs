use std::path::Path;

use anyhow::Result;
use napigen_utils::{find_best_match, normalize_line_endings, read_text};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// What to do when more than one template line carries the same marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerPolicy {
    /// Splice at the first match and log the others.
    #[default]
    FirstWins,
    /// Refuse to guess.
    Strict,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("marker `{marker}` not found in template{}", hint(.suggestion))]
    MissingMarker {
        marker: String,
        suggestion: Option<String>,
    },
    #[error("marker `{marker}` is ambiguous, it ends lines {lines:?}")]
    DuplicateMarker { marker: String, lines: Vec<usize> },
}

fn hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|line| format!(", closest line is `{line}`"))
        .unwrap_or_default()
}

/// A text template handled as an array of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    lines: Vec<String>,
}

impl Template {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: normalize_line_endings(text)
                .split('\n')
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::parse(&read_text(path)?))
    }

    /// Indices of the lines that end with `marker`, ignoring trailing
    /// whitespace.
    pub fn marker_lines(&self, marker: &str) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.trim_end().ends_with(marker))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Replaces the marker line with `insert`. The marker line itself is
    /// dropped.
    pub fn splice(
        &mut self,
        marker: &str,
        insert: Vec<String>,
        policy: MarkerPolicy,
    ) -> Result<(), TemplateError> {
        let matches = self.marker_lines(marker);
        let Some(&index) = matches.first() else {
            return Err(TemplateError::MissingMarker {
                marker: marker.to_string(),
                suggestion: find_best_match(
                    marker,
                    self.lines.iter().map(|line| line.trim().to_string()),
                ),
            });
        };

        if matches.len() > 1 {
            let lines: Vec<usize> = matches.iter().map(|idx| idx + 1).collect();
            match policy {
                MarkerPolicy::FirstWins => {
                    warn!(marker, ?lines, "marker found more than once, using the first");
                }
                MarkerPolicy::Strict => {
                    return Err(TemplateError::DuplicateMarker {
                        marker: marker.to_string(),
                        lines,
                    });
                }
            }
        }

        self.lines.splice(index..=index, insert);
        Ok(())
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}
