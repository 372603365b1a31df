use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Actor recorded when a write does not say who performed it.
pub const UNKNOWN_ACTOR: &str = "unknown";

/// Identity and audit fields shared by every stored entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub uqid: Uuid,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl Audit {
    /// Creates audit fields for a brand new entity with a fresh `uqid`.
    pub fn new(actor: impl Into<String>) -> Self {
        let now = Utc::now();
        let actor = actor.into();
        Self {
            uqid: Uuid::new_v4(),
            created_at: now,
            created_by: actor.clone(),
            updated_at: now,
            updated_by: actor,
        }
    }

    /// Returns a copy stamped as updated by `actor` at `now`.
    ///
    /// Identity and creation stamps are carried over unchanged.
    pub fn touched(&self, actor: &str, now: DateTime<Utc>) -> Self {
        Self {
            uqid: self.uqid,
            created_at: self.created_at,
            created_by: self.created_by.clone(),
            updated_at: now,
            updated_by: actor.to_string(),
        }
    }
}

/// A scalar attribute value compared by list filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(u64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// A filterable attribute: its name and how to read it from an entity.
pub struct Field<E> {
    pub name: &'static str,
    pub get: fn(&E) -> FieldValue,
}

/// Contract every stored record satisfies.
///
/// Entities are value records: repositories hand out clones and a write
/// replaces the whole record under the same `uqid`.
pub trait Entity: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Partial set of attributes merged over an existing record on update.
    type Patch: fmt::Debug + Send + Sync;

    /// Human readable type name used in errors and logs.
    const ENTITY_TYPE: &'static str;

    /// Attributes that list queries may filter on.
    const FIELDS: &'static [Field<Self>];

    fn audit(&self) -> &Audit;

    fn uqid(&self) -> Uuid {
        self.audit().uqid
    }

    /// Looks up a filterable attribute by name.
    fn field(name: &str) -> Option<&'static Field<Self>> {
        Self::FIELDS.iter().find(|field| field.name == name)
    }

    /// Builds the record that results from merging `patch` over `self`.
    fn apply(&self, patch: &Self::Patch, actor: &str, now: DateTime<Utc>) -> Self;
}

/// A bulletin event that users can like and comment on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    pub description: String,
    /// Link to the event's cover image.
    pub img_link: String,
    pub number_of_likes: u64,
}

impl Event {
    /// Creates a new event with no likes.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        img_link: impl Into<String>,
    ) -> Self {
        Self {
            audit: Audit::new(UNKNOWN_ACTOR),
            name: name.into(),
            description: description.into(),
            img_link: img_link.into(),
            number_of_likes: 0,
        }
    }

    /// Sets the like counter (useful for seeding and tests).
    pub fn with_likes(mut self, number_of_likes: u64) -> Self {
        self.number_of_likes = number_of_likes;
        self
    }
}

/// Attributes that may change on an [`Event`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub img_link: Option<String>,
    pub number_of_likes: Option<u64>,
}

impl EventPatch {
    pub fn likes(number_of_likes: u64) -> Self {
        Self {
            number_of_likes: Some(number_of_likes),
            ..Self::default()
        }
    }
}

impl Entity for Event {
    type Patch = EventPatch;

    const ENTITY_TYPE: &'static str = "Event";

    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "name",
            get: |event| FieldValue::from(event.name.as_str()),
        },
        Field {
            name: "description",
            get: |event| FieldValue::from(event.description.as_str()),
        },
        Field {
            name: "img_link",
            get: |event| FieldValue::from(event.img_link.as_str()),
        },
        Field {
            name: "number_of_likes",
            get: |event| FieldValue::from(event.number_of_likes),
        },
        Field {
            name: "created_by",
            get: |event| FieldValue::from(event.audit.created_by.as_str()),
        },
        Field {
            name: "updated_by",
            get: |event| FieldValue::from(event.audit.updated_by.as_str()),
        },
    ];

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn apply(&self, patch: &EventPatch, actor: &str, now: DateTime<Utc>) -> Self {
        Self {
            audit: self.audit.touched(actor, now),
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            img_link: patch
                .img_link
                .clone()
                .unwrap_or_else(|| self.img_link.clone()),
            number_of_likes: patch.number_of_likes.unwrap_or(self.number_of_likes),
        }
    }
}

/// A comment left by a user on an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(flatten)]
    pub audit: Audit,
    /// The event this comment was created under.
    pub event_uqid: Uuid,
    pub user: String,
    pub text: String,
    pub number_of_likes: u64,
}

impl Comment {
    /// Creates a new comment authored by `user`.
    pub fn new(event_uqid: Uuid, user: impl Into<String>, text: impl Into<String>) -> Self {
        let user = user.into();
        Self {
            audit: Audit::new(user.clone()),
            event_uqid,
            user,
            text: text.into(),
            number_of_likes: 0,
        }
    }

    /// Overrides the creation timestamp (useful for testing ordering).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.audit.created_at = created_at;
        self.audit.updated_at = created_at;
        self
    }
}

/// Attributes that may change on a [`Comment`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPatch {
    pub text: Option<String>,
    pub number_of_likes: Option<u64>,
}

impl CommentPatch {
    pub fn likes(number_of_likes: u64) -> Self {
        Self {
            number_of_likes: Some(number_of_likes),
            ..Self::default()
        }
    }
}

impl Entity for Comment {
    type Patch = CommentPatch;

    const ENTITY_TYPE: &'static str = "Comment";

    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "event_uqid",
            get: |comment| FieldValue::from(comment.event_uqid),
        },
        Field {
            name: "user",
            get: |comment| FieldValue::from(comment.user.as_str()),
        },
        Field {
            name: "text",
            get: |comment| FieldValue::from(comment.text.as_str()),
        },
        Field {
            name: "number_of_likes",
            get: |comment| FieldValue::from(comment.number_of_likes),
        },
        Field {
            name: "created_by",
            get: |comment| FieldValue::from(comment.audit.created_by.as_str()),
        },
        Field {
            name: "updated_by",
            get: |comment| FieldValue::from(comment.audit.updated_by.as_str()),
        },
    ];

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn apply(&self, patch: &CommentPatch, actor: &str, now: DateTime<Utc>) -> Self {
        Self {
            audit: self.audit.touched(actor, now),
            event_uqid: self.event_uqid,
            user: self.user.clone(),
            text: patch.text.clone().unwrap_or_else(|| self.text.clone()),
            number_of_likes: patch.number_of_likes.unwrap_or(self.number_of_likes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_event_has_fresh_identity_and_no_likes() {
        let first = Event::new("Meetup", "Monthly meetup", "https://img");
        let second = Event::new("Meetup", "Monthly meetup", "https://img");

        assert_ne!(first.uqid(), second.uqid());
        assert_eq!(first.number_of_likes, 0);
        assert_eq!(first.audit.created_by, UNKNOWN_ACTOR);
        assert_eq!(first.audit.created_at, first.audit.updated_at);
    }

    #[test]
    fn test_event_patch_merges_over_snapshot() {
        let event = Event::new("Meetup", "Monthly meetup", "https://img").with_likes(3);
        let later = event.audit.created_at + Duration::seconds(5);

        let patch = EventPatch {
            name: Some("Hackathon".to_string()),
            ..EventPatch::default()
        };
        let updated = event.apply(&patch, "bob", later);

        assert_eq!(updated.uqid(), event.uqid());
        assert_eq!(updated.name, "Hackathon");
        assert_eq!(updated.description, "Monthly meetup");
        assert_eq!(updated.img_link, "https://img");
        assert_eq!(updated.number_of_likes, 3);
        assert_eq!(updated.audit.created_at, event.audit.created_at);
        assert_eq!(updated.audit.created_by, event.audit.created_by);
        assert_eq!(updated.audit.updated_at, later);
        assert_eq!(updated.audit.updated_by, "bob");
        // The original record is untouched
        assert_eq!(event.name, "Meetup");
    }

    #[test]
    fn test_comment_patch_keeps_owner_and_author() {
        let event_uqid = Uuid::new_v4();
        let comment = Comment::new(event_uqid, "carol", "Nice!");

        let updated = comment.apply(&CommentPatch::likes(7), UNKNOWN_ACTOR, Utc::now());

        assert_eq!(updated.event_uqid, event_uqid);
        assert_eq!(updated.user, "carol");
        assert_eq!(updated.text, "Nice!");
        assert_eq!(updated.number_of_likes, 7);
        assert_eq!(updated.audit.created_by, "carol");
    }

    #[test]
    fn test_field_lookup_reads_declared_attributes() {
        let event = Event::new("Meetup", "", "").with_likes(2);

        let name = Event::field("name").unwrap();
        let likes = Event::field("number_of_likes").unwrap();

        assert_eq!((name.get)(&event), FieldValue::from("Meetup"));
        assert_eq!((likes.get)(&event), FieldValue::Number(2));
        assert!(Event::field("colour").is_none());
        assert!(Comment::field("event_uqid").is_some());
        assert!(Comment::field("name").is_none());
    }

    #[test]
    fn test_field_value_deserializes_untagged() {
        let number: FieldValue = serde_json::from_str("5").unwrap();
        let text: FieldValue = serde_json::from_str("\"five\"").unwrap();

        assert_eq!(number, FieldValue::Number(5));
        assert_eq!(text, FieldValue::Text("five".to_string()));
    }

    #[test]
    fn test_field_value_display_distinguishes_text_from_numbers() {
        assert_eq!(FieldValue::Number(1).to_string(), "1");
        assert_eq!(FieldValue::from("1").to_string(), "\"1\"");
    }

    #[test]
    fn test_event_serializes_flat() {
        let event = Event::new("Meetup", "Monthly meetup", "https://img");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["uqid"], event.uqid().to_string());
        assert_eq!(json["name"], "Meetup");
        assert!(json.get("audit").is_none());
    }
}
