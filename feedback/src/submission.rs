//! # Submission Module
//!
//! Normalized view of a student submission as an ordered set of named files, each an
//! ordered sequence of text lines. Submissions come in several kinds (plain source
//! files, notebooks made of code and markdown cells, images); every kind extracts to
//! the same line-addressable form so the rest of the pipeline has one uniform contract.
//!
//! Line numbering is 1-based and global per file: a notebook's cells are concatenated
//! in cell order and numbered as one sequence. The prompt shows exactly these numbers
//! and the reconciler checks against exactly these numbers, so no transformation may
//! happen in between.

use tracing::warn;

/// The kind of a notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Code,
    Markdown,
}

/// One cell of a notebook submission, already decoded to text.
#[derive(Debug, Clone)]
pub struct NotebookCell {
    pub kind: CellKind,
    pub source: String,
}

impl NotebookCell {
    pub fn code(source: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Code,
            source: source.into(),
        }
    }

    pub fn markdown(source: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Markdown,
            source: source.into(),
        }
    }
}

/// A single submitted artifact, tagged by kind.
///
/// Every variant knows how to extract addressable line-numbered text; an image
/// extracts no lines, so line annotations against it can never reconcile.
#[derive(Debug, Clone)]
pub enum SubmissionSource {
    Plain {
        filename: String,
        content: String,
    },
    Notebook {
        filename: String,
        cells: Vec<NotebookCell>,
    },
    Image {
        filename: String,
    },
}

impl SubmissionSource {
    pub fn filename(&self) -> &str {
        match self {
            SubmissionSource::Plain { filename, .. } => filename,
            SubmissionSource::Notebook { filename, .. } => filename,
            SubmissionSource::Image { filename } => filename,
        }
    }

    fn extract_lines(&self) -> Vec<String> {
        match self {
            SubmissionSource::Plain { content, .. } => {
                content.lines().map(str::to_string).collect()
            }
            SubmissionSource::Notebook { cells, .. } => cells
                .iter()
                .flat_map(|cell| cell.source.lines())
                .map(str::to_string)
                .collect(),
            SubmissionSource::Image { .. } => Vec::new(),
        }
    }
}

/// A named file of a submission as an ordered sequence of text lines.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub filename: String,
    lines: Vec<String>,
}

impl SourceFile {
    pub fn new(filename: impl Into<String>, content: &str) -> Self {
        Self {
            filename: filename.into(),
            lines: content.lines().map(str::to_string).collect(),
        }
    }

    fn from_lines(filename: String, lines: Vec<String>) -> Self {
        Self { filename, lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Looks up a line by its 1-based number.
    ///
    /// This is the single place where the wire's 1-based numbering meets the
    /// 0-based vector index; everything else passes line numbers through untouched.
    pub fn line(&self, number: u32) -> Option<&str> {
        if number == 0 {
            return None;
        }
        self.lines.get(number as usize - 1).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Ordered collection of a submission's files.
///
/// Constructed once per grading request and immutable thereafter. Filename lookup is
/// case-sensitive exact match only; fuzzy matching here would misattribute feedback.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    files: Vec<SourceFile>,
}

impl Submission {
    /// Builds a submission from its sources, preserving order.
    ///
    /// A duplicate filename keeps the first occurrence; the duplicate is logged.
    pub fn from_sources(sources: Vec<SubmissionSource>) -> Self {
        let mut files: Vec<SourceFile> = Vec::new();
        for source in sources {
            if files.iter().any(|f| f.filename == source.filename()) {
                warn!(
                    filename = %source.filename(),
                    "duplicate filename in submission, keeping the first"
                );
                continue;
            }
            let lines = source.extract_lines();
            files.push(SourceFile::from_lines(source.filename().to_string(), lines));
        }
        Self { files }
    }

    /// Looks up a file by exact, case-sensitive filename.
    pub fn file(&self, filename: &str) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.filename == filename)
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_line_numbering() {
        let submission = Submission::from_sources(vec![SubmissionSource::Plain {
            filename: "a.py".to_string(),
            content: "import math\n\nprint(math.pi)\n".to_string(),
        }]);

        let file = submission.file("a.py").unwrap();
        assert_eq!(file.line_count(), 3);
        assert_eq!(file.line(1), Some("import math"));
        assert_eq!(file.line(2), Some(""));
        assert_eq!(file.line(3), Some("print(math.pi)"));
        assert_eq!(file.line(0), None);
        assert_eq!(file.line(4), None);
    }

    #[test]
    fn test_notebook_numbering_spans_cells() {
        let submission = Submission::from_sources(vec![SubmissionSource::Notebook {
            filename: "hw1.ipynb".to_string(),
            cells: vec![
                NotebookCell::markdown("# Question 1"),
                NotebookCell::code("x = 1\ny = 2"),
                NotebookCell::code("print(x + y)"),
            ],
        }]);

        let file = submission.file("hw1.ipynb").unwrap();
        assert_eq!(file.line_count(), 4);
        assert_eq!(file.line(1), Some("# Question 1"));
        assert_eq!(file.line(2), Some("x = 1"));
        assert_eq!(file.line(3), Some("y = 2"));
        assert_eq!(file.line(4), Some("print(x + y)"));
    }

    #[test]
    fn test_image_has_no_addressable_lines() {
        let submission = Submission::from_sources(vec![SubmissionSource::Image {
            filename: "plot.png".to_string(),
        }]);

        let file = submission.file("plot.png").unwrap();
        assert_eq!(file.line_count(), 0);
        assert_eq!(file.line(1), None);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let submission = Submission::from_sources(vec![SubmissionSource::Plain {
            filename: "Main.py".to_string(),
            content: "pass".to_string(),
        }]);

        assert!(submission.file("Main.py").is_some());
        assert!(submission.file("main.py").is_none());
    }

    #[test]
    fn test_duplicate_filename_keeps_first() {
        let submission = Submission::from_sources(vec![
            SubmissionSource::Plain {
                filename: "a.py".to_string(),
                content: "first".to_string(),
            },
            SubmissionSource::Plain {
                filename: "a.py".to_string(),
                content: "second".to_string(),
            },
        ]);

        assert_eq!(submission.files().len(), 1);
        assert_eq!(submission.file("a.py").unwrap().line(1), Some("first"));
    }
}
