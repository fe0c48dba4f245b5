use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub u32);

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: SourceId,
    pub path: PathBuf,
    pub contents: String,
}

impl SourceFile {
    pub fn new(id: SourceId, path: PathBuf, contents: String) -> Self {
        Self { id, path, contents }
    }

    /// Wraps an in-memory program under the placeholder path `<input>`.
    pub fn from_string(contents: impl Into<String>) -> Self {
        Self::new(SourceId(0), PathBuf::from("<input>"), contents.into())
    }

    /// Returns the 1-based line, without its terminator.
    pub fn line(&self, line: usize) -> Option<&str> {
        self.contents.lines().nth(line.checked_sub(1)?)
    }
}
