//! Read-only view of the chat state cache
//!
//! The renderer never owns chat state. It asks a [`ChatStore`] for display
//! data and, when something is missing, drops a [`FetchRequest`] into the
//! store and moves on without waiting.

use serde::Serialize;

use super::ids::{ChannelId, GuildId, RoleId, UserId};
use super::user::{Channel, Member, Role, User};

/// Request for the state layer to fetch a missing entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetchRequest {
    Member { guild: GuildId, user: UserId },
    User { user: UserId },
    Role { guild: GuildId, role: RoleId },
    Channel { channel: ChannelId },
}

/// Synchronous, local lookups into cached chat state
///
/// Lookups must not block on the network. `request` is fire-and-forget:
/// implementations queue the request and return immediately.
pub trait ChatStore: Send + Sync {
    fn user(&self, id: UserId) -> Option<User>;

    fn member(&self, guild: GuildId, user: UserId) -> Option<Member>;

    fn role(&self, guild: GuildId, role: RoleId) -> Option<Role>;

    fn channel(&self, id: ChannelId) -> Option<Channel>;

    fn request(&self, request: FetchRequest);

    /// Color of the highest positioned colored role of a member
    fn member_color(&self, guild: GuildId, member: &Member) -> Option<u32> {
        member
            .roles
            .iter()
            .filter_map(|id| self.role(guild, *id))
            .filter(|role| role.color != 0)
            .max_by_key(|role| role.position)
            .map(|role| role.color)
    }

    /// Roles of a member, highest position first
    fn member_roles(&self, guild: GuildId, member: &Member) -> Vec<Role> {
        let mut roles: Vec<Role> = member
            .roles
            .iter()
            .filter_map(|id| self.role(guild, *id))
            .collect();
        roles.sort_by(|a, b| b.position.cmp(&a.position));
        roles
    }
}
