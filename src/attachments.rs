//! Pending attachment selection with a total-size budget.
//!
//! Files can always be added; the budget is enforced by classification,
//! not at add time. Walking the selection in order, a file is `Ready`
//! while the running total stays within the budget; the first file that
//! crosses it, and every file after it, is `Waiting`. The caller gates
//! submission on [`FileBatchAccumulator::over_budget`].

use std::path::Path;

use uuid::Uuid;

/// Default total-size budget for one submission, in KiB.
pub const MAX_TOTAL_SIZE_KB: f64 = 400.0;

/// A candidate attachment held in memory until submitted or removed.
///
/// Every file gets a locally generated id at construction; removal is
/// keyed by it, so two selected files with the same name stay distinct.
#[derive(Debug, Clone)]
pub struct PendingFile {
    id: Uuid,
    name: String,
    content: Vec<u8>,
    content_type: Option<String>,
}

impl PendingFile {
    pub fn from_bytes(name: impl Into<String>, content: Vec<u8>) -> Self {
        PendingFile {
            id: Uuid::new_v4(),
            name: name.into(),
            content,
            content_type: None,
        }
    }

    /// Read a file from disk, naming it after its final path component.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Ok(PendingFile::from_bytes(name, content))
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn size_kb(&self) -> f64 {
        self.content.len() as f64 / 1024.0
    }
}

/// Per-file admission decision against the running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Ready,
    Waiting,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Ready => write!(f, "ready"),
            FileStatus::Waiting => write!(f, "waiting"),
        }
    }
}

/// Ordered, user-editable set of pending files.
#[derive(Debug)]
pub struct FileBatchAccumulator {
    files: Vec<PendingFile>,
    max_total_size_kb: f64,
}

impl Default for FileBatchAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl FileBatchAccumulator {
    pub fn new() -> Self {
        Self::with_budget(MAX_TOTAL_SIZE_KB)
    }

    pub fn with_budget(max_total_size_kb: f64) -> Self {
        FileBatchAccumulator {
            files: Vec::new(),
            max_total_size_kb,
        }
    }

    /// Append files to the end of the selection. Never rejects, whatever
    /// the sizes; the budget only affects classification.
    pub fn add(&mut self, files: impl IntoIterator<Item = PendingFile>) {
        self.files.extend(files);
    }

    /// Remove one file by its id. Returns the file, or `None` if the id
    /// is not in the selection.
    pub fn remove(&mut self, id: Uuid) -> Option<PendingFile> {
        let index = self.files.iter().position(|f| f.id == id)?;
        Some(self.files.remove(index))
    }

    /// Walk the selection in order, marking each file `Ready` while the
    /// running total (including that file) stays within the budget. Once
    /// the total crosses it, that file and every later one is `Waiting`.
    pub fn classify(&self) -> impl Iterator<Item = (&PendingFile, FileStatus)> + '_ {
        self.files.iter().scan(0.0_f64, |running, file| {
            *running += file.size_kb();
            let status = if *running <= self.max_total_size_kb {
                FileStatus::Ready
            } else {
                FileStatus::Waiting
            };
            Some((file, status))
        })
    }

    /// The `Ready` prefix of the selection.
    pub fn ready_files(&self) -> Vec<&PendingFile> {
        self.classify()
            .filter(|(_, status)| *status == FileStatus::Ready)
            .map(|(file, _)| file)
            .collect()
    }

    pub fn total_size_kb(&self) -> f64 {
        self.files.iter().map(PendingFile::size_kb).sum()
    }

    /// Submission gate: the caller blocks submission while this is true.
    pub fn over_budget(&self) -> bool {
        self.total_size_kb() > self.max_total_size_kb
    }

    pub fn budget_kb(&self) -> f64 {
        self.max_total_size_kb
    }

    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Drop the whole selection (dialog dismissed).
    pub fn clear(&mut self) {
        self.files.clear();
    }
}
