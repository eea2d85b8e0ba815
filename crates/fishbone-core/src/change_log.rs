//! Human-readable record of what a batch changed

use serde::{Deserialize, Serialize};

/// One line per applied command, in batch order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeLog {
    lines: Vec<String>,
}

impl ChangeLog {
    /// Empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line
    pub fn record(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Lines in order
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing was applied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl std::fmt::Display for ChangeLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_line_per_entry() {
        let mut log = ChangeLog::new();
        log.record("Added category \"People\"");
        log.record("Cleared the diagram");
        assert_eq!(log.len(), 2);
        assert_eq!(log.to_string(), "Added category \"People\"\nCleared the diagram");
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut log = ChangeLog::new();
        log.record("x");
        assert_eq!(serde_json::to_string(&log).unwrap(), r#"["x"]"#);
    }
}
