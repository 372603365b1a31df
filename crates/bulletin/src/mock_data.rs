use bulletin_core::bulletin::{Entity, Event, EventPatch};
use bulletin_core::storage::Result;

use crate::service::EventService;

const DEMO_IMG_LINK: &str = "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQGg117hTNrhTBDkX0CTSHEnp7LRdOsrl76CQ&s";

/// Creates the demo event with its first comment.
pub async fn seed_demo_data(service: &EventService) -> Result<Event> {
    let draft = EventPatch {
        name: Some("Test Event".to_string()),
        description: Some("Pokemon Stadium Tournament".to_string()),
        img_link: Some(DEMO_IMG_LINK.to_string()),
        number_of_likes: Some(0),
    };
    let event = service.create_or_update_event(None, draft).await?;

    service
        .add_comment(event.uqid(), "First Comment", "Test Comment")
        .await?;

    tracing::info!(uqid = %event.uqid(), "Seeded demo event");
    Ok(event)
}
