//! Mention resolution
//!
//! Mentions are resolved against the message (its attached mention list)
//! and then the store. A miss renders the mention in its source form and
//! queues a fetch; the render never waits for it.

use super::state::RenderState;
use crate::cdn;
use crate::markdown::MentionRef;
use crate::model::{ChannelId, FetchRequest, RoleId, User, UserId};
use crate::rich::{AvatarAnchor, Mention, MentionData, MentionKind, Rgba, SegmentKind};

pub(crate) fn render(state: &mut RenderState<'_>, reference: MentionRef) {
    match reference {
        MentionRef::User(id) => render_user(state, id, None),
        MentionRef::Role(id) => render_role(state, id),
        MentionRef::Channel(id) => render_channel(state, id),
    }
}

/// Render a user mention; `known` skips the lookup of the user itself
pub(crate) fn render_user(state: &mut RenderState<'_>, id: UserId, known: Option<&User>) {
    let ctx = state.ctx();
    let guild = ctx.guild_id();

    let user = known.cloned().or_else(|| {
        ctx.message
            .and_then(|m| m.mentions.iter().find(|u| u.id == id).cloned())
            .or_else(|| ctx.store.and_then(|store| store.user(id)))
    });
    let member = match (guild, ctx.store) {
        (Some(guild), Some(store)) => store.member(guild, id),
        _ => None,
    };

    if member.is_none() {
        match guild {
            Some(guild) => state.request(FetchRequest::Member { guild, user: id }),
            None if user.is_none() => state.request(FetchRequest::User { user: id }),
            None => {}
        }
    }

    let base = &state.config().cdn_base;
    let size = state.config().avatar_size;
    let data = match (&member, &user) {
        (Some(member), _) => {
            let avatar_url = match (guild, member.avatar.as_deref()) {
                (Some(guild), Some(hash)) => cdn::member_avatar_url(base, guild, id, hash, size),
                _ => cdn::avatar_url(base, id, member.user.avatar.as_deref(), size),
            };
            let color = guild
                .zip(ctx.store)
                .and_then(|(guild, store)| store.member_color(guild, member))
                .map(Rgba::from_rgb);
            Some(MentionData {
                name: member.display_name().to_string(),
                color,
                avatar_url: Some(avatar_url),
            })
        }
        (None, Some(user)) => Some(MentionData {
            name: user.display_name().to_string(),
            color: None,
            avatar_url: Some(cdn::avatar_url(base, id, user.avatar.as_deref(), size)),
        }),
        (None, None) => None,
    };

    match data {
        Some(data) => write_resolved(state, MentionKind::User, id.get(), "@", data),
        None => write_fallback(state, MentionKind::User, id.get(), MentionRef::User(id)),
    }
}

fn render_role(state: &mut RenderState<'_>, id: RoleId) {
    let ctx = state.ctx();
    let Some(guild) = ctx.guild_id() else {
        write_fallback(state, MentionKind::Role, id.get(), MentionRef::Role(id));
        return;
    };

    match ctx.store.and_then(|store| store.role(guild, id)) {
        Some(role) => {
            let data = MentionData {
                name: role.name,
                color: (role.color != 0).then(|| Rgba::from_rgb(role.color)),
                avatar_url: None,
            };
            write_resolved(state, MentionKind::Role, id.get(), "@", data);
        }
        None => {
            state.request(FetchRequest::Role { guild, role: id });
            write_fallback(state, MentionKind::Role, id.get(), MentionRef::Role(id));
        }
    }
}

fn render_channel(state: &mut RenderState<'_>, id: ChannelId) {
    let ctx = state.ctx();
    match ctx.store.and_then(|store| store.channel(id)) {
        Some(channel) => {
            let data = MentionData {
                name: channel.name,
                color: None,
                avatar_url: None,
            };
            write_resolved(state, MentionKind::Channel, id.get(), "#", data);
        }
        None => {
            state.request(FetchRequest::Channel { channel: id });
            write_fallback(state, MentionKind::Channel, id.get(), MentionRef::Channel(id));
        }
    }
}

fn write_resolved(
    state: &mut RenderState<'_>,
    kind: MentionKind,
    id: u64,
    sigil: &str,
    data: MentionData,
) {
    if kind == MentionKind::User && state.config().mention_avatars {
        if let Some(url) = &data.avatar_url {
            state.anchor(SegmentKind::Avatar(AvatarAnchor {
                url: url.clone(),
                size: state.config().avatar_size,
                alt_text: data.name.clone(),
            }));
        }
    }

    let (start, end) = state.write(&format!("{}{}", sigil, data.name));
    if let Some(color) = data.color {
        state.emit(start, end, SegmentKind::Color { color });
    }
    let guild_id = state.ctx().guild_id();
    state.emit(
        start,
        end,
        SegmentKind::Mention(Mention {
            kind,
            id,
            guild_id,
            resolved: Some(data),
        }),
    );
}

fn write_fallback(state: &mut RenderState<'_>, kind: MentionKind, id: u64, reference: MentionRef) {
    tracing::debug!(?kind, id, "Mention not in cache, rendering source form");
    let (start, end) = state.write(&reference.source_form());
    let guild_id = state.ctx().guild_id();
    state.emit(
        start,
        end,
        SegmentKind::Mention(Mention {
            kind,
            id,
            guild_id,
            resolved: None,
        }),
    );
}
