//! In-memory chat store
//!
//! Backs the CLI and tests. Fetch requests are forwarded over an unbounded
//! channel so whoever owns the receiver can fulfil them on its own schedule.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc;

use super::ids::{ChannelId, GuildId, RoleId, UserId};
use super::store::{ChatStore, FetchRequest};
use super::user::{Channel, Member, Role, User};

/// `ChatStore` backed by concurrent hash maps
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
    members: DashMap<(GuildId, UserId), Member>,
    roles: DashMap<(GuildId, RoleId), Role>,
    channels: DashMap<ChannelId, Channel>,
    requests: Option<mpsc::UnboundedSender<FetchRequest>>,
    request_count: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose fetch requests are delivered to the returned receiver
    pub fn with_requests() -> (Self, mpsc::UnboundedReceiver<FetchRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let store = Self {
            requests: Some(tx),
            ..Self::default()
        };
        (store, rx)
    }

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Insert a member; the member's user is cached as well
    pub fn insert_member(&self, guild: GuildId, member: Member) {
        self.users.insert(member.user.id, member.user.clone());
        self.members.insert((guild, member.user.id), member);
    }

    pub fn insert_role(&self, guild: GuildId, role: Role) {
        self.roles.insert((guild, role.id), role);
    }

    pub fn insert_channel(&self, channel: Channel) {
        self.channels.insert(channel.id, channel);
    }

    /// Number of fetch requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }
}

impl ChatStore for MemoryStore {
    fn user(&self, id: UserId) -> Option<User> {
        self.users.get(&id).map(|entry| entry.value().clone())
    }

    fn member(&self, guild: GuildId, user: UserId) -> Option<Member> {
        self.members
            .get(&(guild, user))
            .map(|entry| entry.value().clone())
    }

    fn role(&self, guild: GuildId, role: RoleId) -> Option<Role> {
        self.roles.get(&(guild, role)).map(|entry| entry.value().clone())
    }

    fn channel(&self, id: ChannelId) -> Option<Channel> {
        self.channels.get(&id).map(|entry| entry.value().clone())
    }

    fn request(&self, request: FetchRequest) {
        self.request_count.fetch_add(1, Ordering::Relaxed);

        if let Some(tx) = &self.requests {
            if tx.send(request).is_err() {
                tracing::debug!(?request, "Fetch request receiver dropped");
            }
        }
    }
}
