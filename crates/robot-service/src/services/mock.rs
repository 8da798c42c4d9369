//! In-memory platform and relay used by the service tests

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use robot_common::{AppConfig, Environment};
use robot_core::{
    Channel, ChannelEdit, DomainError, GuildMember, GuildPlatform, Invite, NewChannel,
    PlatformResult, Relay, Role, Snowflake,
};

use super::context::{KnownChannels, ServiceContext};

pub const GUILD: Snowflake = Snowflake::new(1000);
pub const STATUS: Snowflake = Snowflake::new(2000);
pub const DOORBELL: Snowflake = Snowflake::new(2001);

pub const SETTINGS: &str = r#"{
    "discord_token": "token",
    "guild_id": "1000",
    "year_role_prefix": "Year",
    "badge_role_prefix": "Badge",
    "badge_role_suffix": "Y",
    "status_channel_name": "bot-status",
    "admin_role": "Admin",
    "doorbell": {"channel": "doorbell", "pin": 17, "allowed_user_role": "Member"},
    "invites": [{"channel": "team-a", "role": "Team A"}],
    "edition": {
        "category_prefix": "Edition",
        "category_permissions": [
            {"role": "@everyone", "remove": ["view_channel"]},
            {"role": "Year", "add": ["view_channel"]}
        ],
        "channels": [
            {"name": "general", "topic": "Chat", "permissions": []},
            {"name": "announcements", "topic": "News", "permissions": [
                {"role": "Year", "remove": ["send_messages"]},
                {"role": "Organizer", "add": ["send_messages", "manage_messages"]}
            ]}
        ]
    }
}"#;

pub const RESPONSES: &str = r#"{"ok": "Opening the door!", "invalidRole": "You may not ring."}"#;

/// A write the services performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AddRole(Snowflake, Snowflake),
    RemoveRoles(Snowflake, Vec<Snowflake>),
    CreateRole(String),
    MoveRole(Snowflake, i32),
    CreateChannel(NewChannel),
    EditChannel(Snowflake, ChannelEdit),
    MoveChannel(Snowflake, i32),
}

#[derive(Default)]
struct State {
    roles: Vec<Role>,
    members: Vec<GuildMember>,
    channels: Vec<Channel>,
    invites: Vec<Invite>,
    calls: Vec<Call>,
    messages: Vec<(Snowflake, String)>,
    next_id: i64,
    reject_writes: bool,
}

#[derive(Default)]
pub struct MockPlatform {
    state: Mutex<State>,
}

impl MockPlatform {
    pub fn new() -> Self {
        let platform = Self::default();
        {
            let mut state = platform.state.lock();
            state.next_id = 5000;
            state.roles.push(Role::everyone(GUILD));
            state.channels.push(Channel::new_text(STATUS, GUILD, "bot-status"));
            state.channels.push(Channel::new_text(DOORBELL, GUILD, "doorbell"));
        }
        platform
    }

    pub fn add_role(&self, id: i64, name: &str, position: i32) -> Role {
        let role = Role::new(Snowflake::new(id), GUILD, name, position);
        self.state.lock().roles.push(role.clone());
        role
    }

    pub fn add_member(&self, id: i64, name: &str, roles: &[&Role]) -> GuildMember {
        let mut member = GuildMember::new(GUILD, Snowflake::new(id), name);
        member.set_roles(roles.iter().map(|role| role.id).collect());
        self.state.lock().members.push(member.clone());
        member
    }

    pub fn add_channel(&self, channel: Channel) {
        self.state.lock().channels.push(channel);
    }

    pub fn reject_writes(&self) {
        self.state.lock().reject_writes = true;
    }

    pub fn member(&self, id: i64) -> GuildMember {
        self.state
            .lock()
            .members
            .iter()
            .find(|member| member.user_id == Snowflake::new(id))
            .cloned()
            .expect("member exists")
    }

    pub fn role_named(&self, name: &str) -> Option<Role> {
        self.state.lock().roles.iter().find(|role| role.name == name).cloned()
    }

    pub fn channel_named(&self, name: &str) -> Option<Channel> {
        self.state
            .lock()
            .channels
            .iter()
            .find(|channel| channel.is_named(name))
            .cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        let mut state = self.state.lock();
        state.calls.clear();
        state.messages.clear();
    }

    pub fn messages(&self, channel_id: Snowflake) -> Vec<String> {
        self.state
            .lock()
            .messages
            .iter()
            .filter(|(id, _)| *id == channel_id)
            .map(|(_, content)| content.clone())
            .collect()
    }

    fn record(state: &mut State, action: &'static str, call: Call) -> PlatformResult<()> {
        if state.reject_writes {
            return Err(DomainError::mutation(action, "Missing Permissions"));
        }
        state.calls.push(call);
        Ok(())
    }

    fn next_id(state: &mut State) -> Snowflake {
        state.next_id += 1;
        Snowflake::new(state.next_id)
    }
}

#[async_trait]
impl GuildPlatform for MockPlatform {
    async fn guild_roles(&self, _guild_id: Snowflake) -> PlatformResult<Vec<Role>> {
        Ok(self.state.lock().roles.clone())
    }

    async fn guild_members(&self, _guild_id: Snowflake) -> PlatformResult<Vec<GuildMember>> {
        Ok(self.state.lock().members.clone())
    }

    async fn guild_channels(&self, _guild_id: Snowflake) -> PlatformResult<Vec<Channel>> {
        Ok(self.state.lock().channels.clone())
    }

    async fn guild_invites(&self, _guild_id: Snowflake) -> PlatformResult<Vec<Invite>> {
        Ok(self.state.lock().invites.clone())
    }

    async fn add_member_role(
        &self,
        _guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        Self::record(&mut state, "add role", Call::AddRole(user_id, role_id))?;
        if let Some(member) = state.members.iter_mut().find(|m| m.user_id == user_id) {
            member.add_role(role_id);
        }
        Ok(())
    }

    async fn remove_member_roles(
        &self,
        _guild_id: Snowflake,
        user_id: Snowflake,
        role_ids: &[Snowflake],
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        Self::record(
            &mut state,
            "remove roles",
            Call::RemoveRoles(user_id, role_ids.to_vec()),
        )?;
        if let Some(member) = state.members.iter_mut().find(|m| m.user_id == user_id) {
            for role_id in role_ids {
                member.remove_role(*role_id);
            }
        }
        Ok(())
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()> {
        self.state
            .lock()
            .messages
            .push((channel_id, content.to_string()));
        Ok(())
    }

    async fn create_role(&self, guild_id: Snowflake, name: &str) -> PlatformResult<Role> {
        let mut state = self.state.lock();
        Self::record(&mut state, "create role", Call::CreateRole(name.to_string()))?;
        let id = Self::next_id(&mut state);
        let role = Role::new(id, guild_id, name, 1);
        state.roles.push(role.clone());
        Ok(role)
    }

    async fn move_role(
        &self,
        _guild_id: Snowflake,
        role_id: Snowflake,
        position: i32,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        Self::record(&mut state, "move role", Call::MoveRole(role_id, position))?;
        if let Some(role) = state.roles.iter_mut().find(|role| role.id == role_id) {
            role.position = position;
        }
        Ok(())
    }

    async fn create_channel(
        &self,
        guild_id: Snowflake,
        channel: &NewChannel,
    ) -> PlatformResult<Channel> {
        let mut state = self.state.lock();
        Self::record(&mut state, "create channel", Call::CreateChannel(channel.clone()))?;
        let id = Self::next_id(&mut state);
        let mut created = if channel.category {
            Channel::new_category(id, guild_id, channel.name.clone())
        } else {
            Channel::new_text(id, guild_id, channel.name.clone())
        };
        created.topic.clone_from(&channel.topic);
        created.parent_id = channel.parent_id;
        created.permission_overwrites.clone_from(&channel.permission_overwrites);
        state.channels.push(created.clone());
        Ok(created)
    }

    async fn edit_channel(
        &self,
        channel_id: Snowflake,
        edit: &ChannelEdit,
    ) -> PlatformResult<Channel> {
        let mut state = self.state.lock();
        Self::record(&mut state, "edit channel", Call::EditChannel(channel_id, edit.clone()))?;
        let channel = state
            .channels
            .iter_mut()
            .find(|channel| channel.id == channel_id)
            .ok_or_else(|| DomainError::ChannelNotFound(channel_id.to_string()))?;
        channel.topic.clone_from(&edit.topic);
        channel.permission_overwrites.clone_from(&edit.permission_overwrites);
        Ok(channel.clone())
    }

    async fn move_channel(
        &self,
        _guild_id: Snowflake,
        channel_id: Snowflake,
        position: i32,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        Self::record(&mut state, "move channel", Call::MoveChannel(channel_id, position))?;
        if let Some(channel) = state.channels.iter_mut().find(|c| c.id == channel_id) {
            channel.position = position;
        }
        Ok(())
    }
}

/// Relay that remembers every pulse
#[derive(Default)]
pub struct RecordingRelay {
    pulses: Mutex<Vec<(u8, Duration)>>,
}

impl RecordingRelay {
    pub fn pulses(&self) -> Vec<(u8, Duration)> {
        self.pulses.lock().clone()
    }
}

#[async_trait]
impl Relay for RecordingRelay {
    async fn pulse(&self, pin: u8, duration: Duration) -> Result<(), DomainError> {
        self.pulses.lock().push((pin, duration));
        Ok(())
    }
}

pub struct Harness {
    pub platform: Arc<MockPlatform>,
    pub relay: Arc<RecordingRelay>,
    pub ctx: ServiceContext,
}

pub fn harness(environment: Environment) -> Harness {
    let config = AppConfig::from_json(SETTINGS, RESPONSES, environment).expect("valid settings");
    let platform = Arc::new(MockPlatform::new());
    let relay = Arc::new(RecordingRelay::default());
    let ctx = ServiceContext::new(platform.clone(), relay.clone(), Arc::new(config))
        .expect("valid context");
    ctx.set_known_channels(KnownChannels {
        status: Some(STATUS),
        doorbell: Some(DOORBELL),
    });
    Harness {
        platform,
        relay,
        ctx,
    }
}
