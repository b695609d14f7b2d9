use std::fmt;

/// Diagnostic level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The part was aborted; none of its records were written.
    Fatal,
    /// Exported, but something was ignored.
    Warning,
    /// Progress note.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fatal => "fatal",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

/// One reported message.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    /// Level.
    pub severity: Severity,
    /// Part the diagnostic belongs to; `None` for effect-level messages.
    pub part: Option<String>,
    /// Text shown to the user.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.part {
            Some(part) => write!(f, "{} [{part}]: {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Everything an export had to say, in the order it was said.
///
/// Every entry is also emitted as a `tracing` event at the matching level.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct ExportReport {
    /// Messages in emission order.
    pub diagnostics: Vec<Diagnostic>,
    /// Part records present in the encoded file.
    pub records_written: usize,
    /// Parts dropped after a fatal diagnostic.
    pub parts_failed: usize,
}

impl ExportReport {
    /// Record a failed part.
    pub fn fatal(&mut self, part: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(part, "{message}");
        self.parts_failed += 1;
        self.push(Severity::Fatal, Some(part), message);
    }

    /// Record a warning against `part`.
    pub fn warning(&mut self, part: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(part, "{message}");
        self.push(Severity::Warning, Some(part), message);
    }

    /// Record an effect-level note.
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.push(Severity::Info, None, message);
    }

    /// Diagnostics of one level, in order.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
    }

    /// Whether any part failed.
    pub fn has_fatal(&self) -> bool {
        self.parts_failed > 0
    }

    fn push(&mut self, severity: Severity, part: Option<&str>, message: String) {
        self.diagnostics.push(Diagnostic {
            severity,
            part: part.map(str::to_string),
            message,
        });
    }
}
