use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::datetime::parse_timestamp;
use crate::utils::error::{FieldErrors, INVALID_DATETIME, REQUIRED};

pub const TITLE_MAX_LEN: usize = 120;
pub const LOCATION_MAX_LEN: usize = 140;

/// Who may see an event in the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Friends,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Friends => "friends",
            Visibility::Private => "private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVisibility(pub String);

impl FromStr for Visibility {
    type Err = UnknownVisibility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "friends" => Ok(Visibility::Friends),
            "private" => Ok(Visibility::Private),
            other => Err(UnknownVisibility(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: String,
    pub visibility: Visibility,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.created_by == user_id
    }

    /// Inclusive on both ends: an event ending exactly at `range_start` still
    /// overlaps.
    pub fn overlaps(&self, range_start: DateTime<Utc>, range_end: DateTime<Utc>) -> bool {
        self.start <= range_end && self.end >= range_start
    }

    pub fn apply(&mut self, changes: EventChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(start) = changes.start {
            self.start = start;
        }
        if let Some(end) = changes.end {
            self.end = end;
        }
        if let Some(location) = changes.location {
            self.location = location;
        }
        if let Some(visibility) = changes.visibility {
            self.visibility = visibility;
        }
    }
}

/// Untrusted field map for create and update, as submitted by the client.
///
/// Every field is optional here; which ones are required depends on whether
/// the input creates an event or patches one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: Option<String>,
    pub visibility: Option<String>,
}

/// Validated fields for a new event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: String,
    pub visibility: Visibility,
}

/// Validated partial update. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub visibility: Option<Visibility>,
}

impl EventInput {
    /// Validates the fields that are present. Missing fields are not an error.
    pub fn into_changes(self) -> Result<EventChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let changes = self.clean(&mut errors);
        errors.into_result(changes)
    }

    /// Validates a complete event: `title`, `start` and `end` must be present,
    /// `visibility` defaults to public.
    pub fn into_new_event(self) -> Result<NewEvent, FieldErrors> {
        let mut errors = FieldErrors::new();
        let changes = self.clean(&mut errors);

        for (field, missing) in [
            ("title", changes.title.is_none()),
            ("start", changes.start.is_none()),
            ("end", changes.end.is_none()),
        ] {
            if missing && !errors.contains(field) {
                errors.add(field, REQUIRED);
            }
        }

        match (changes.title, changes.start, changes.end) {
            (Some(title), Some(start), Some(end)) if errors.is_empty() => Ok(NewEvent {
                title,
                description: changes.description.unwrap_or_default(),
                start,
                end,
                location: changes.location.unwrap_or_default(),
                visibility: changes.visibility.unwrap_or_default(),
            }),
            _ => Err(errors),
        }
    }

    fn clean(self, errors: &mut FieldErrors) -> EventChanges {
        EventChanges {
            title: self
                .title
                .and_then(|v| clean_text(errors, "title", &v, Some(TITLE_MAX_LEN), true)),
            description: self
                .description
                .and_then(|v| clean_text(errors, "description", &v, None, false)),
            start: self.start.and_then(|v| clean_timestamp(errors, "start", &v)),
            end: self.end.and_then(|v| clean_timestamp(errors, "end", &v)),
            location: self
                .location
                .and_then(|v| clean_text(errors, "location", &v, Some(LOCATION_MAX_LEN), false)),
            visibility: self
                .visibility
                .and_then(|v| clean_visibility(errors, &v)),
        }
    }
}

fn clean_text(
    errors: &mut FieldErrors,
    field: &str,
    raw: &str,
    max_len: Option<usize>,
    required: bool,
) -> Option<String> {
    let value = raw.trim();
    if required && value.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    if let Some(max) = max_len {
        let len = value.chars().count();
        if len > max {
            errors.add(
                field,
                format!("Ensure this value has at most {max} characters (it has {len})."),
            );
            return None;
        }
    }
    Some(value.to_string())
}

fn clean_timestamp(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<DateTime<Utc>> {
    if raw.trim().is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
        errors.add(field, INVALID_DATETIME);
    }
    parsed
}

fn clean_visibility(errors: &mut FieldErrors, raw: &str) -> Option<Visibility> {
    let value = raw.trim();
    if value.is_empty() {
        errors.add("visibility", REQUIRED);
        return None;
    }
    match value.parse::<Visibility>() {
        Ok(visibility) => Some(visibility),
        Err(UnknownVisibility(choice)) => {
            errors.add(
                "visibility",
                format!("Select a valid choice. {choice} is not one of the available choices."),
            );
            None
        }
    }
}

/// Raw `?start=&end=` bounds of a feed request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl FeedQuery {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    pub fn parse_range(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), FieldErrors> {
        let mut errors = FieldErrors::new();
        let start = parse_bound(&mut errors, "start", self.start.as_deref());
        let end = parse_bound(&mut errors, "end", self.end.as_deref());
        match (start, end) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(errors),
        }
    }
}

fn parse_bound(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<&str>,
) -> Option<DateTime<Utc>> {
    match raw {
        Some(raw) => clean_timestamp(errors, field, raw),
        None => {
            errors.add(field, REQUIRED);
            None
        }
    }
}

/// Feed entry in the shape calendar widgets consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventView {
    pub id: Uuid,
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(rename = "extendedProps")]
    pub extended_props: ExtendedProps,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendedProps {
    pub description: String,
    pub location: String,
    pub visibility: Visibility,
    #[serde(rename = "isOwner")]
    pub is_owner: bool,
}

impl EventView {
    pub fn for_viewer(event: Event, viewer: Uuid) -> Self {
        let is_owner = event.is_owned_by(viewer);
        Self {
            id: event.id,
            title: event.title,
            start: event.start.to_rfc3339(),
            end: event.end.to_rfc3339(),
            extended_props: ExtendedProps {
                description: event.description,
                location: event.location,
                visibility: event.visibility,
                is_owner,
            },
        }
    }
}
