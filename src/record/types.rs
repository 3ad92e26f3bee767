//! Types for raw status-change records and their normalized form.
//!
//! Raw records arrive from the record store with type-tagged fields, one tag
//! per database property type. `LogEntry` is the canonical shape everything
//! downstream consumes — reports, context feeds, and retention all read it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A raw record as returned by the record store, fields still type-tagged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,

    #[serde(default)]
    pub created_time: String,

    #[serde(default)]
    pub last_edited_time: String,

    /// Named properties, each carrying its own type tag.
    #[serde(default)]
    pub properties: BTreeMap<String, RawField>,
}

/// A single typed property value. The `type` tag mirrors the database's
/// property types; anything unrecognized lands in `Unsupported` and
/// normalizes to a zero value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawField {
    Title {
        #[serde(default)]
        title: Vec<TextFragment>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<TextFragment>,
    },
    Select {
        #[serde(default)]
        select: Option<SelectValue>,
    },
    Status {
        #[serde(default)]
        status: Option<SelectValue>,
    },
    Date {
        #[serde(default)]
        date: Option<DateValue>,
    },
    Checkbox {
        #[serde(default)]
        checkbox: bool,
    },
    People {
        #[serde(default)]
        people: Vec<Person>,
    },
    Relation {
        #[serde(default)]
        relation: Vec<RelationRef>,
    },
    #[serde(other)]
    Unsupported,
}

impl RawField {
    /// Build a title field from plain text.
    pub fn title(text: impl Into<String>) -> Self {
        RawField::Title {
            title: vec![TextFragment {
                plain_text: text.into(),
            }],
        }
    }

    /// Build a rich-text field from plain text.
    pub fn rich_text(text: impl Into<String>) -> Self {
        RawField::RichText {
            rich_text: vec![TextFragment {
                plain_text: text.into(),
            }],
        }
    }

    /// Build a select field with the given option name.
    pub fn select(name: impl Into<String>) -> Self {
        RawField::Select {
            select: Some(SelectValue { name: name.into() }),
        }
    }

    /// Build a status field with the given status name.
    pub fn status(name: impl Into<String>) -> Self {
        RawField::Status {
            status: Some(SelectValue { name: name.into() }),
        }
    }

    /// Build a date field from a start instant string.
    pub fn date(start: impl Into<String>) -> Self {
        RawField::Date {
            date: Some(DateValue {
                start: start.into(),
                end: None,
            }),
        }
    }

    /// Build a checkbox field.
    pub fn checkbox(checked: bool) -> Self {
        RawField::Checkbox { checkbox: checked }
    }

    /// Build a people field from display names.
    pub fn people<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawField::People {
            people: names
                .into_iter()
                .map(|n| Person {
                    name: n.into(),
                    id: String::new(),
                })
                .collect(),
        }
    }

    /// Build a relation field from record ids.
    pub fn relation<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawField::Relation {
            relation: ids
                .into_iter()
                .map(|id| RelationRef { id: id.into() })
                .collect(),
        }
    }
}

/// One fragment of title or rich-text content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextFragment {
    #[serde(default)]
    pub plain_text: String,
}

/// The selected option of a select or status field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectValue {
    #[serde(default)]
    pub name: String,
}

/// A date field value. `start` is the instant string as stored upstream,
/// possibly carrying an offset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateValue {
    #[serde(default)]
    pub start: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// A person referenced by a people field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
}

/// A reference to another record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationRef {
    #[serde(default)]
    pub id: String,
}

/// A normalized status-change record. Immutable once created; every field
/// is populated (strings default to empty, the date to `None`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,

    /// Human-readable title of the record.
    #[serde(default)]
    pub log_entry: String,

    /// When the status change happened. Timezone-naive: any offset on the
    /// input was dropped, keeping the wall-clock reading.
    pub date: Option<NaiveDateTime>,

    #[serde(default)]
    pub project_name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub platform: String,

    #[serde(default)]
    pub release_type: String,

    #[serde(default)]
    pub previous_status: String,

    #[serde(default)]
    pub new_status: String,

    #[serde(default)]
    pub team: String,

    #[serde(default)]
    pub sub_team: String,

    /// Users who made the change, in upstream order.
    #[serde(default)]
    pub changed_by: Vec<String>,

    #[serde(default)]
    pub whats_new: String,

    #[serde(default)]
    pub automation_source: bool,

    /// Ids of related records.
    #[serde(default)]
    pub project_link: Vec<String>,

    /// External bookkeeping timestamps, passed through untouched.
    #[serde(default)]
    pub created_time: String,

    #[serde(default)]
    pub last_edited_time: String,
}

impl LogEntry {
    /// The status transition as displayed in rankings and reports.
    pub fn transition(&self) -> String {
        format!("{} → {}", self.previous_status, self.new_status)
    }

    /// Whether this entry carries a usable instant.
    pub fn has_date(&self) -> bool {
        self.date.is_some()
    }
}
