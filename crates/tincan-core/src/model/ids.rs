//! Snowflake identifier newtypes

use serde::{Deserialize, Serialize};

macro_rules! snowflake {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(pub u64);

            impl $name {
                pub const fn get(self) -> u64 {
                    self.0
                }
            }

            impl From<u64> for $name {
                fn from(value: u64) -> Self {
                    Self(value)
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )+
    };
}

snowflake!(
    /// User account ID
    UserId,
    /// Guild role ID
    RoleId,
    /// Text channel ID
    ChannelId,
    /// Guild (server) ID
    GuildId,
    /// Message ID
    MessageId,
    /// Custom emoji ID
    EmojiId,
);
