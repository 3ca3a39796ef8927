//! Chat data model consumed by the renderer

mod ids;
mod memory;
mod message;
mod store;
mod user;

pub use ids::{ChannelId, EmojiId, GuildId, MessageId, RoleId, UserId};
pub use memory::MemoryStore;
pub use message::{Attachment, Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedMedia, Message};
pub use store::{ChatStore, FetchRequest};
pub use user::{Activity, ActivityEmoji, ActivityKind, Channel, Member, Role, User};
