use chrono::{DateTime, Utc};

/// Sapphire, the accent colour of the status embed.
pub const STATUS_COLOR: u32 = 0x0F52BA;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A link-style action button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAction {
    pub label: String,
    pub url: String,
}

/// Platform-neutral view of the status message, derived from a summary at
/// render time. It has no identity of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<RenderedField>,
    pub timestamp: DateTime<Utc>,
    pub link: LinkAction,
}

impl RenderedMessage {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}
