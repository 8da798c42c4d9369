//! Test helpers: an in-memory guild, a recording relay and a bot harness

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use robot_common::{AppConfig, Environment};
use robot_core::{
    Channel, ChannelEdit, DomainError, GuildMember, GuildPlatform, Invite, NewChannel,
    PlatformEvent, PlatformResult, Relay, Role, Snowflake,
};
use robot_gateway::EventDispatcher;
use robot_service::ServiceContextBuilder;

use crate::fixtures::{GUILD_ID, RESPONSES_JSON, SETTINGS_JSON};

#[derive(Debug, Default)]
struct GuildData {
    roles: Vec<Role>,
    members: Vec<GuildMember>,
    channels: Vec<Channel>,
    invites: Vec<Invite>,
    /// (channel id, content) of every posted message
    posted: Vec<(Snowflake, String)>,
    /// Number of role and channel writes
    writes: usize,
    next_id: i64,
}

impl GuildData {
    fn allocate_id(&mut self) -> Snowflake {
        self.next_id += 1;
        Snowflake::new(self.next_id)
    }
}

/// A single guild held in memory, behaving like the platform would
#[derive(Debug)]
pub struct InMemoryGuild {
    guild_id: Snowflake,
    data: RwLock<GuildData>,
}

impl InMemoryGuild {
    /// An empty guild holding only @everyone
    pub fn new(guild_id: Snowflake) -> Self {
        let data = GuildData {
            roles: vec![Role::everyone(guild_id)],
            next_id: 10_000,
            ..GuildData::default()
        };
        Self {
            guild_id,
            data: RwLock::new(data),
        }
    }

    /// Add a role above every existing one
    pub fn role(&self, name: &str) -> Role {
        let mut data = self.data.write();
        let id = data.allocate_id();
        let position = data.roles.iter().map(|r| r.position).max().unwrap_or(0) + 1;
        let role = Role::new(id, self.guild_id, name, position);
        data.roles.push(role.clone());
        role
    }

    /// Add a text channel
    pub fn text_channel(&self, name: &str) -> Channel {
        let mut data = self.data.write();
        let id = data.allocate_id();
        let channel = Channel::new_text(id, self.guild_id, name);
        data.channels.push(channel.clone());
        channel
    }

    /// Add a member holding the named roles
    pub fn member(&self, username: &str, role_names: &[&str]) -> GuildMember {
        let mut data = self.data.write();
        let id = data.allocate_id();
        let mut member = GuildMember::new(self.guild_id, id, username);
        let role_ids = role_names
            .iter()
            .map(|name| {
                data.roles
                    .iter()
                    .find(|role| role.name == *name)
                    .map(|role| role.id)
                    .unwrap_or_else(|| panic!("role {name} exists"))
            })
            .collect();
        member.set_roles(role_ids);
        data.members.push(member.clone());
        member
    }

    /// Create or update an invite counter
    pub fn set_invite(&self, code: &str, channel: &Channel, uses: u64) {
        let mut data = self.data.write();
        let invite = Invite::new(code, self.guild_id, channel.id)
            .with_channel_name(channel.name_or_id())
            .with_uses(uses);
        match data.invites.iter_mut().find(|i| i.code == code) {
            Some(existing) => *existing = invite,
            None => data.invites.push(invite),
        }
    }

    /// Give a member a role outside the bot (a moderator action)
    pub fn grant(&self, user_id: Snowflake, role_name: &str) -> GuildMember {
        let mut data = self.data.write();
        let role_id = data
            .roles
            .iter()
            .find(|role| role.name == role_name)
            .map(|role| role.id)
            .unwrap_or_else(|| panic!("role {role_name} exists"));
        let member = data
            .members
            .iter_mut()
            .find(|member| member.user_id == user_id)
            .unwrap_or_else(|| panic!("member {user_id} exists"));
        member.add_role(role_id);
        member.clone()
    }

    /// Current state of a member
    pub fn current(&self, user_id: Snowflake) -> GuildMember {
        self.data
            .read()
            .members
            .iter()
            .find(|member| member.user_id == user_id)
            .cloned()
            .unwrap_or_else(|| panic!("member {user_id} exists"))
    }

    /// Names of the roles a member holds, sorted
    pub fn role_names(&self, user_id: Snowflake) -> Vec<String> {
        let member = self.current(user_id);
        let data = self.data.read();
        let mut names: Vec<String> = data
            .roles
            .iter()
            .filter(|role| member.has_role(role.id))
            .map(|role| role.name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn find_role(&self, name: &str) -> Option<Role> {
        self.data.read().roles.iter().find(|r| r.name == name).cloned()
    }

    pub fn find_channel(&self, name: &str) -> Option<Channel> {
        self.data
            .read()
            .channels
            .iter()
            .find(|channel| channel.is_named(name))
            .cloned()
    }

    /// Channels whose parent is the given category
    pub fn children(&self, category_id: Snowflake) -> Vec<Channel> {
        self.data
            .read()
            .channels
            .iter()
            .filter(|channel| channel.parent_id == Some(category_id))
            .cloned()
            .collect()
    }

    /// Messages posted in a channel
    pub fn posted(&self, channel: &Channel) -> Vec<String> {
        self.data
            .read()
            .posted
            .iter()
            .filter(|(id, _)| *id == channel.id)
            .map(|(_, content)| content.clone())
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.data.read().writes
    }

    fn update_member(
        &self,
        user_id: Snowflake,
        apply: impl FnOnce(&mut GuildMember),
    ) -> PlatformResult<()> {
        let mut data = self.data.write();
        data.writes += 1;
        let member = data
            .members
            .iter_mut()
            .find(|member| member.user_id == user_id)
            .ok_or(DomainError::MemberNotFound(user_id))?;
        apply(member);
        Ok(())
    }
}

#[async_trait]
impl GuildPlatform for InMemoryGuild {
    async fn guild_roles(&self, _guild_id: Snowflake) -> PlatformResult<Vec<Role>> {
        Ok(self.data.read().roles.clone())
    }

    async fn guild_members(&self, _guild_id: Snowflake) -> PlatformResult<Vec<GuildMember>> {
        Ok(self.data.read().members.clone())
    }

    async fn guild_channels(&self, _guild_id: Snowflake) -> PlatformResult<Vec<Channel>> {
        Ok(self.data.read().channels.clone())
    }

    async fn guild_invites(&self, _guild_id: Snowflake) -> PlatformResult<Vec<Invite>> {
        Ok(self.data.read().invites.clone())
    }

    async fn add_member_role(
        &self,
        _guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()> {
        self.update_member(user_id, |member| member.add_role(role_id))
    }

    async fn remove_member_roles(
        &self,
        _guild_id: Snowflake,
        user_id: Snowflake,
        role_ids: &[Snowflake],
    ) -> PlatformResult<()> {
        self.update_member(user_id, |member| {
            for role_id in role_ids {
                member.remove_role(*role_id);
            }
        })
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()> {
        self.data.write().posted.push((channel_id, content.to_string()));
        Ok(())
    }

    async fn create_role(&self, guild_id: Snowflake, name: &str) -> PlatformResult<Role> {
        let mut data = self.data.write();
        data.writes += 1;
        let id = data.allocate_id();
        // New roles land just above @everyone
        for role in data.roles.iter_mut().filter(|role| !role.is_everyone) {
            role.position += 1;
        }
        let role = Role::new(id, guild_id, name, 1);
        data.roles.push(role.clone());
        Ok(role)
    }

    async fn move_role(
        &self,
        _guild_id: Snowflake,
        role_id: Snowflake,
        position: i32,
    ) -> PlatformResult<()> {
        let mut data = self.data.write();
        data.writes += 1;
        let role = data
            .roles
            .iter_mut()
            .find(|role| role.id == role_id)
            .ok_or_else(|| DomainError::RoleNotFound(role_id.to_string()))?;
        role.position = position;
        Ok(())
    }

    async fn create_channel(
        &self,
        guild_id: Snowflake,
        channel: &NewChannel,
    ) -> PlatformResult<Channel> {
        let mut data = self.data.write();
        data.writes += 1;
        let id = data.allocate_id();
        let mut created = if channel.category {
            Channel::new_category(id, guild_id, channel.name.clone())
        } else {
            Channel::new_text(id, guild_id, channel.name.clone())
        };
        created.topic.clone_from(&channel.topic);
        created.parent_id = channel.parent_id;
        created.position = data.channels.len() as i32;
        created
            .permission_overwrites
            .clone_from(&channel.permission_overwrites);
        data.channels.push(created.clone());
        Ok(created)
    }

    async fn edit_channel(
        &self,
        channel_id: Snowflake,
        edit: &ChannelEdit,
    ) -> PlatformResult<Channel> {
        let mut data = self.data.write();
        data.writes += 1;
        let channel = data
            .channels
            .iter_mut()
            .find(|channel| channel.id == channel_id)
            .ok_or_else(|| DomainError::ChannelNotFound(channel_id.to_string()))?;
        channel.topic.clone_from(&edit.topic);
        channel
            .permission_overwrites
            .clone_from(&edit.permission_overwrites);
        Ok(channel.clone())
    }

    async fn move_channel(
        &self,
        _guild_id: Snowflake,
        channel_id: Snowflake,
        position: i32,
    ) -> PlatformResult<()> {
        let mut data = self.data.write();
        data.writes += 1;
        let channel = data
            .channels
            .iter_mut()
            .find(|channel| channel.id == channel_id)
            .ok_or_else(|| DomainError::ChannelNotFound(channel_id.to_string()))?;
        channel.position = position;
        Ok(())
    }
}

/// Relay that counts pulses instead of touching hardware
#[derive(Debug, Default)]
pub struct CountingRelay {
    pulses: RwLock<Vec<(u8, Duration)>>,
}

impl CountingRelay {
    pub fn pulses(&self) -> Vec<(u8, Duration)> {
        self.pulses.read().clone()
    }
}

#[async_trait]
impl Relay for CountingRelay {
    async fn pulse(&self, pin: u8, duration: Duration) -> Result<(), DomainError> {
        self.pulses.write().push((pin, duration));
        Ok(())
    }
}

/// A dispatcher wired to an in-memory guild
pub struct TestBot {
    pub guild: Arc<InMemoryGuild>,
    pub relay: Arc<CountingRelay>,
    pub dispatcher: EventDispatcher,
}

impl TestBot {
    /// Build a bot from the fixture settings
    pub fn start(guild: InMemoryGuild, environment: Environment) -> Result<Self> {
        let config = AppConfig::from_json(SETTINGS_JSON, RESPONSES_JSON, environment)?;
        let guild = Arc::new(guild);
        let relay = Arc::new(CountingRelay::default());

        let ctx = ServiceContextBuilder::new()
            .platform(guild.clone())
            .relay(relay.clone())
            .config(Arc::new(config))
            .build()?;

        Ok(Self {
            guild,
            relay,
            dispatcher: EventDispatcher::new(ctx),
        })
    }

    /// Feed one event through the dispatcher
    pub async fn send(&self, event: PlatformEvent) {
        self.dispatcher.dispatch(event).await;
    }

    /// Deliver the guild-available event, as after connecting
    pub async fn connect(&self) {
        self.send(PlatformEvent::GuildAvailable { guild_id: GUILD_ID })
            .await;
    }
}
