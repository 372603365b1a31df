use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bulletin_core::bulletin::{Entity, Event, EventPatch};
use bulletin_core::storage::RepositoryError;

use super::required;

/// Event as exposed over HTTP. Never embeds comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDto {
    pub uqid: Uuid,
    pub name: String,
    pub description: String,
    pub img_link: String,
    pub number_of_likes: u64,
}

impl From<Event> for EventDto {
    fn from(event: Event) -> Self {
        Self {
            uqid: event.uqid(),
            name: event.name,
            description: event.description,
            img_link: event.img_link,
            number_of_likes: event.number_of_likes,
        }
    }
}

/// Request payload for creating (no `uqid`) or updating an event.
#[derive(Debug, Default, Deserialize)]
pub struct UpsertEvent {
    #[serde(default)]
    pub uqid: Option<Uuid>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub img_link: Option<String>,
}

impl UpsertEvent {
    /// Splits the payload into the target event, if any, and the fields to
    /// write.
    pub fn into_parts(self) -> (Option<Uuid>, EventPatch) {
        let patch = EventPatch {
            name: self.name,
            description: self.description,
            img_link: self.img_link,
            number_of_likes: None,
        };
        (self.uqid, patch)
    }
}

/// Request payload for liking an event.
#[derive(Debug, Default, Deserialize)]
pub struct LikeEvent {
    #[serde(default)]
    pub uqid: Option<Uuid>,
}

impl LikeEvent {
    pub fn uqid(&self) -> Result<Uuid, RepositoryError> {
        required(self.uqid, "uqid")
    }
}
