use crate::metadata::Metadata;
use crate::severity::Severity;

/// Inputs of a single log call, as handed over by the façade.
///
/// `file`, `function` and `line` are carried for interface compatibility;
/// the line format does not use them.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    pub level: Severity,
    pub message: &'a str,
    pub metadata: Option<&'a Metadata>,
    pub source: &'a str,
    pub file: &'a str,
    pub function: &'a str,
    pub line: u32,
}

impl<'a> LogRecord<'a> {
    pub fn new(level: Severity, message: &'a str) -> Self {
        Self {
            level,
            message,
            metadata: None,
            source: "",
            file: "",
            function: "",
            line: 0,
        }
    }

    pub fn with_metadata(mut self, metadata: &'a Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_source(mut self, source: &'a str) -> Self {
        self.source = source;
        self
    }

    pub fn with_location(mut self, file: &'a str, function: &'a str, line: u32) -> Self {
        self.file = file;
        self.function = function;
        self.line = line;
        self
    }
}
