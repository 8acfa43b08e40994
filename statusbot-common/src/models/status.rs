/// One `{name, status}` pair from the upstream summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub name: String,
    pub status: String,
}

impl StatusEntry {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }
}

/// Normalized result of a single fetch. Each sequence keeps the upstream order
/// and may be empty; placeholders are a presentation concern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub incidents: Vec<StatusEntry>,
    pub scheduled_maintenances: Vec<StatusEntry>,
    pub components: Vec<StatusEntry>,
}
