//! User tooltip shown when hovering a mention

use super::state::RenderContext;
use super::Renderer;
use crate::cdn;
use crate::model::{ChatStore, FetchRequest, GuildId, User};
use crate::rich::{Attribute, AvatarAnchor, Rgba, RichText, SegmentKind};

impl Renderer<'_> {
    /// Avatar, bold display name, `@username`, then the member's roles
    /// (highest first, each in its color)
    pub fn render_user_tooltip(
        &self,
        user: &User,
        guild: Option<GuildId>,
        store: Option<&dyn ChatStore>,
    ) -> RichText {
        let ctx = RenderContext::new(None, store);
        self.compose(ctx, |state| {
            let config = state.config();
            let member = guild
                .zip(store)
                .and_then(|(guild, store)| store.member(guild, user.id));
            if let (Some(guild), None) = (guild, &member) {
                state.request(FetchRequest::Member {
                    guild,
                    user: user.id,
                });
            }

            let avatar = match (guild, member.as_ref().and_then(|m| m.avatar.as_deref())) {
                (Some(guild), Some(hash)) => {
                    cdn::member_avatar_url(&config.cdn_base, guild, user.id, hash, config.avatar_size)
                }
                _ => cdn::avatar_url(&config.cdn_base, user.id, user.avatar.as_deref(), config.avatar_size),
            };
            let name = member
                .as_ref()
                .map(|m| m.display_name())
                .unwrap_or_else(|| user.display_name());

            state.anchor(SegmentKind::Avatar(AvatarAnchor {
                url: avatar,
                size: config.avatar_size,
                alt_text: name.to_string(),
            }));
            state.write(" ");
            state.write_with(Attribute::BOLD, name);
            state.ensure_break();
            state.write(&format!("@{}", user.username));

            let (Some(guild), Some(member), Some(store)) = (guild, &member, store) else {
                return;
            };
            for role in store.member_roles(guild, member) {
                state.ensure_break();
                let (start, end) = state.write(&role.name);
                if role.color != 0 {
                    state.emit(
                        start,
                        end,
                        SegmentKind::Color {
                            color: Rgba::from_rgb(role.color),
                        },
                    );
                }
            }
        })
    }
}
