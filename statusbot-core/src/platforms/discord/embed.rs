//! Conversion of a [`RenderedMessage`] into Discord's embed + component model.

use tracing::warn;
use twilight_model::channel::message::component::{ActionRow, Button, ButtonStyle, Component};
use twilight_model::channel::message::embed::Embed;
use twilight_model::util::Timestamp;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFieldBuilder};

use statusbot_common::models::message::{LinkAction, RenderedMessage};

pub fn to_embed(message: &RenderedMessage) -> Embed {
    let mut builder = EmbedBuilder::new()
        .title(&message.title)
        .description(&message.description)
        .color(message.color);

    for field in &message.fields {
        let mut f = EmbedFieldBuilder::new(&field.name, &field.value);
        if field.inline {
            f = f.inline();
        }
        builder = builder.field(f.build());
    }

    match Timestamp::from_micros(message.timestamp.timestamp_micros()) {
        Ok(ts) => builder = builder.timestamp(ts),
        Err(e) => warn!("Dropping embed timestamp {}: {e}", message.timestamp),
    }

    builder.build()
}

/// A single action row holding the link button.
pub fn link_row(link: &LinkAction) -> Component {
    Component::ActionRow(ActionRow {
        components: vec![Component::Button(Button {
            custom_id: None,
            disabled: false,
            emoji: None,
            label: Some(link.label.clone()),
            style: ButtonStyle::Link,
            url: Some(link.url.clone()),
            sku_id: None,
        })],
    })
}
