//! Users, members, roles and channels as seen by the renderer

use serde::{Deserialize, Serialize};

use super::ids::{ChannelId, GuildId, RoleId, UserId};

/// A user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Display name chosen by the user, shown instead of the username
    #[serde(default)]
    pub global_name: Option<String>,
    /// Avatar hash (`a_` prefix for animated avatars)
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            global_name: None,
            avatar: None,
            bot: false,
        }
    }

    /// Name shown in chat when no guild nickname applies
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

/// A user's membership in a guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user: User,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<RoleId>,
    /// Guild-specific avatar hash
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Member {
    pub fn new(user: User) -> Self {
        Self {
            user,
            nick: None,
            roles: Vec::new(),
            avatar: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.nick
            .as_deref()
            .unwrap_or_else(|| self.user.display_name())
    }
}

/// A guild role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    /// RGB color, 0 means the role does not color names
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub position: i32,
}

/// A guild or private channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    pub name: String,
}

/// Kind of a presence activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Playing,
    Streaming,
    Listening,
    Watching,
    Custom,
    Competing,
}

/// Emoji attached to a custom status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEmoji {
    pub name: String,
    /// Present for custom emoji, absent for unicode emoji
    #[serde(default)]
    pub id: Option<super::ids::EmojiId>,
    #[serde(default)]
    pub animated: bool,
}

/// A presence activity ("Playing ...", custom status, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub emoji: Option<ActivityEmoji>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_precedence() {
        let mut user = User::new(1, "ferris");
        assert_eq!(user.display_name(), "ferris");

        user.global_name = Some("Ferris".into());
        assert_eq!(user.display_name(), "Ferris");

        let mut member = Member::new(user);
        assert_eq!(member.display_name(), "Ferris");

        member.nick = Some("crab".into());
        assert_eq!(member.display_name(), "crab");
    }
}
