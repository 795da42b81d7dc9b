//! Splitting the input into labeled blocks.

use crate::abi::LABEL_PUNCTUATION;

/// One trimmed input line and its 1-based position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    /// Trim every line of `source` and number it from 1.
    pub fn from_source(source: &str) -> Vec<Self> {
        source
            .lines()
            .enumerate()
            .map(|(idx, line)| Self::new(idx + 1, line.trim()))
            .collect()
    }
}

/// A named block of lines, starting with its own declaration line.
#[derive(Debug, Clone)]
pub struct Label {
    name: String,
    lines: Vec<SourceLine>,
}

impl Label {
    fn open(declaration: &SourceLine) -> Self {
        let raw = declaration
            .text
            .split_once(':')
            .map_or(declaration.text.as_str(), |(name, _)| name);
        Self {
            name: sanitize(raw),
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All lines of the block, declaration first.
    #[must_use]
    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    /// Lines after the declaration line.
    #[must_use]
    pub fn body(&self) -> &[SourceLine] {
        self.lines.get(1..).unwrap_or_default()
    }
}

/// Strip `@`, `%`, spaces and dots from a label name.
#[must_use]
pub fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| !LABEL_PUNCTUATION.contains(c))
        .collect()
}

#[must_use]
pub fn is_label(line: &str) -> bool {
    line.contains(':')
}

/// Partition `lines` into blocks, one per label declaration, in input order.
///
/// Lines before the first declaration belong to no block and are dropped.
#[must_use]
pub fn split_labels(lines: &[SourceLine]) -> Vec<Label> {
    let mut labels = Vec::new();
    let mut current: Option<Label> = None;

    for line in lines {
        if is_label(&line.text) {
            if let Some(done) = current.take() {
                labels.push(done);
            }
            current = Some(Label::open(line));
        }
        if let Some(label) = current.as_mut() {
            label.lines.push(line.clone());
        }
    }
    labels.extend(current);

    tracing::debug!(blocks = labels.len(), "split input into labeled blocks");
    labels
}
