use chrono::{DateTime, Utc};

use statusbot_common::error::FetchError;
use statusbot_common::models::message::{LinkAction, RenderedField, RenderedMessage, STATUS_COLOR};
use statusbot_common::models::status::{StatusEntry, StatusSummary};

pub const INCIDENTS_FIELD: &str = "Incidents";
pub const MAINTENANCE_FIELD: &str = "Maintenance";
pub const COMPONENTS_FIELD: &str = "Components";

pub const NO_INCIDENTS: &str = "No active incidents.";
pub const NO_MAINTENANCE: &str = "No scheduled maintenance.";
pub const ALL_OPERATIONAL: &str = "All systems operational.";
pub const FETCH_ERROR_PLACEHOLDER: &str = "Error fetching data.";

/// Discord rejects embed field values above this many characters.
pub const FIELD_VALUE_LIMIT: usize = 1024;

const TRUNCATION_MARK: &str = "…";

/// Turns a fetch result into the message shown in the status channel.
#[derive(Debug, Clone)]
pub struct StatusPresenter {
    title: String,
    description: String,
    link_label: String,
    status_page_url: String,
}

impl StatusPresenter {
    pub fn new(service_name: &str, status_page_url: impl Into<String>) -> Self {
        Self {
            title: "Server Status".to_string(),
            description: format!("{service_name} services status update."),
            link_label: "View Status".to_string(),
            status_page_url: status_page_url.into(),
        }
    }

    pub fn render(&self, summary: &Result<StatusSummary, FetchError>) -> RenderedMessage {
        self.render_at(summary, Utc::now())
    }

    /// Same as [`render`](Self::render) with an explicit timestamp.
    pub fn render_at(
        &self,
        summary: &Result<StatusSummary, FetchError>,
        now: DateTime<Utc>,
    ) -> RenderedMessage {
        let (incidents, maintenance, components) = match summary {
            Ok(s) => (
                section(&s.incidents, NO_INCIDENTS),
                section(&s.scheduled_maintenances, NO_MAINTENANCE),
                section(&s.components, ALL_OPERATIONAL),
            ),
            Err(_) => (
                FETCH_ERROR_PLACEHOLDER.to_string(),
                FETCH_ERROR_PLACEHOLDER.to_string(),
                FETCH_ERROR_PLACEHOLDER.to_string(),
            ),
        };

        RenderedMessage {
            title: self.title.clone(),
            description: self.description.clone(),
            color: STATUS_COLOR,
            fields: vec![
                field(INCIDENTS_FIELD, incidents),
                field(MAINTENANCE_FIELD, maintenance),
                field(COMPONENTS_FIELD, components),
            ],
            timestamp: now,
            link: LinkAction {
                label: self.link_label.clone(),
                url: self.status_page_url.clone(),
            },
        }
    }
}

fn field(name: &str, value: String) -> RenderedField {
    RenderedField {
        name: name.to_string(),
        value: fit_field_value(value),
        inline: false,
    }
}

/// `**name**: status` per entry, newline separated; `placeholder` when empty.
pub fn section(entries: &[StatusEntry], placeholder: &str) -> String {
    if entries.is_empty() {
        return placeholder.to_string();
    }
    entries
        .iter()
        .map(|e| format!("**{}**: {}", e.name, e.status))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cuts an over-long value back to whole lines so it fits in one embed field.
fn fit_field_value(value: String) -> String {
    if value.chars().count() <= FIELD_VALUE_LIMIT {
        return value;
    }

    let budget = FIELD_VALUE_LIMIT - TRUNCATION_MARK.chars().count();
    let mut kept = String::new();
    let mut used = 0;
    for line in value.lines() {
        let sep = usize::from(!kept.is_empty());
        let len = line.chars().count();
        if used + sep + len > budget {
            break;
        }
        if sep == 1 {
            kept.push('\n');
        }
        kept.push_str(line);
        used += sep + len;
    }

    // A single line longer than the whole budget.
    if kept.is_empty() {
        kept = value.chars().take(budget).collect();
        kept.push_str(TRUNCATION_MARK);
        return kept;
    }

    kept.push_str(TRUNCATION_MARK);
    kept
}
