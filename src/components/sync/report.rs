/// An event that reached the calendar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedEvent {
    pub source_url: String,
    pub identity_key: String,
    /// Link to the entry in the calendar UI, when the calendar returns one
    pub html_link: Option<String>,
}

/// A link that could not be synced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFailure {
    pub source_url: String,
    pub error: String,
}

/// Outcome of one sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Number of event links found in the listing
    pub discovered: usize,
    pub imported: Vec<ImportedEvent>,
    pub failures: Vec<LinkFailure>,
    /// True when the run stopped early on request
    pub cancelled: bool,
}

impl SyncReport {
    pub fn succeeded(&self) -> usize {
        self.imported.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Links attempted so far, whatever the outcome
    pub fn processed(&self) -> usize {
        self.succeeded() + self.failed()
    }

    /// Every discovered link was imported
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failures.is_empty() && self.succeeded() == self.discovered
    }
}
