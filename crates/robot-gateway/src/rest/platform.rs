//! [`GuildPlatform`] over the REST API

use async_trait::async_trait;
use reqwest::Method;
use robot_core::{
    Channel, ChannelEdit, ChannelType, DomainError, GuildMember, GuildPlatform, Invite,
    NewChannel, PlatformResult, Role, Snowflake,
};
use serde_json::{json, Value};

use super::client::{RestClient, RestError};
use crate::events::{ChannelPayload, InvitePayload, MemberPayload, RolePayload};

/// Largest member page the API returns
const MEMBER_PAGE_SIZE: usize = 1000;

/// Platform adapter backed by the REST API
#[derive(Debug, Clone)]
pub struct RestPlatform {
    client: RestClient,
}

impl RestPlatform {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    async fn write(
        &self,
        action: &'static str,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> PlatformResult<reqwest::Response> {
        self.client
            .request(method, path, body.as_ref())
            .await
            .map_err(|e| DomainError::mutation(action, e.to_string()))
    }
}

fn read_error(e: RestError) -> DomainError {
    DomainError::PlatformError(e.to_string())
}

/// Wire body for creating a channel
fn new_channel_body(channel: &NewChannel) -> Value {
    let kind = if channel.category {
        ChannelType::GuildCategory
    } else {
        ChannelType::GuildText
    };
    let mut body = json!({
        "name": channel.name,
        "type": kind.as_u8(),
        "permission_overwrites": channel.permission_overwrites,
    });
    if let Some(topic) = &channel.topic {
        body["topic"] = json!(topic);
    }
    if let Some(parent_id) = channel.parent_id {
        body["parent_id"] = json!(parent_id);
    }
    body
}

#[async_trait]
impl GuildPlatform for RestPlatform {
    async fn guild_roles(&self, guild_id: Snowflake) -> PlatformResult<Vec<Role>> {
        let roles: Vec<RolePayload> = self
            .client
            .get(&format!("/guilds/{guild_id}/roles"))
            .await
            .map_err(read_error)?;
        Ok(roles.into_iter().map(|role| role.into_role(guild_id)).collect())
    }

    async fn guild_members(&self, guild_id: Snowflake) -> PlatformResult<Vec<GuildMember>> {
        let mut members = Vec::new();
        let mut after = Snowflake::default();

        loop {
            let page: Vec<MemberPayload> = self
                .client
                .get(&format!(
                    "/guilds/{guild_id}/members?limit={MEMBER_PAGE_SIZE}&after={after}"
                ))
                .await
                .map_err(read_error)?;
            let full_page = page.len() == MEMBER_PAGE_SIZE;

            for payload in page {
                after = after.max(payload.user.id);
                members.push(payload.into_member(guild_id));
            }
            if !full_page {
                break;
            }
        }

        tracing::debug!(guild_id = %guild_id, count = members.len(), "Fetched guild members");
        Ok(members)
    }

    async fn guild_channels(&self, guild_id: Snowflake) -> PlatformResult<Vec<Channel>> {
        let channels: Vec<ChannelPayload> = self
            .client
            .get(&format!("/guilds/{guild_id}/channels"))
            .await
            .map_err(read_error)?;
        Ok(channels.into_iter().map(Channel::from).collect())
    }

    async fn guild_invites(&self, guild_id: Snowflake) -> PlatformResult<Vec<Invite>> {
        let invites: Vec<InvitePayload> = self
            .client
            .get(&format!("/guilds/{guild_id}/invites"))
            .await
            .map_err(read_error)?;
        Ok(invites
            .into_iter()
            .map(|invite| invite.into_invite(guild_id))
            .collect())
    }

    async fn add_member_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()> {
        self.write(
            "add role",
            Method::PUT,
            &format!("/guilds/{guild_id}/members/{user_id}/roles/{role_id}"),
            None,
        )
        .await?;
        Ok(())
    }

    async fn remove_member_roles(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_ids: &[Snowflake],
    ) -> PlatformResult<()> {
        // The API removes one role per call
        for role_id in role_ids {
            self.write(
                "remove roles",
                Method::DELETE,
                &format!("/guilds/{guild_id}/members/{user_id}/roles/{role_id}"),
                None,
            )
            .await?;
        }
        Ok(())
    }

    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()> {
        self.write(
            "send message",
            Method::POST,
            &format!("/channels/{channel_id}/messages"),
            Some(json!({ "content": content })),
        )
        .await?;
        Ok(())
    }

    async fn create_role(&self, guild_id: Snowflake, name: &str) -> PlatformResult<Role> {
        let response = self
            .write(
                "create role",
                Method::POST,
                &format!("/guilds/{guild_id}/roles"),
                Some(json!({ "name": name })),
            )
            .await?;
        let role: RolePayload = response.json().await.map_err(|e| read_error(e.into()))?;
        Ok(role.into_role(guild_id))
    }

    async fn move_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
        position: i32,
    ) -> PlatformResult<()> {
        self.write(
            "move role",
            Method::PATCH,
            &format!("/guilds/{guild_id}/roles"),
            Some(json!([{ "id": role_id, "position": position }])),
        )
        .await?;
        Ok(())
    }

    async fn create_channel(
        &self,
        guild_id: Snowflake,
        channel: &NewChannel,
    ) -> PlatformResult<Channel> {
        let response = self
            .write(
                "create channel",
                Method::POST,
                &format!("/guilds/{guild_id}/channels"),
                Some(new_channel_body(channel)),
            )
            .await?;
        let created: ChannelPayload = response.json().await.map_err(|e| read_error(e.into()))?;
        Ok(created.into())
    }

    async fn edit_channel(
        &self,
        channel_id: Snowflake,
        edit: &ChannelEdit,
    ) -> PlatformResult<Channel> {
        let response = self
            .write(
                "edit channel",
                Method::PATCH,
                &format!("/channels/{channel_id}"),
                Some(json!({
                    "topic": edit.topic,
                    "permission_overwrites": edit.permission_overwrites,
                })),
            )
            .await?;
        let edited: ChannelPayload = response.json().await.map_err(|e| read_error(e.into()))?;
        Ok(edited.into())
    }

    async fn move_channel(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
        position: i32,
    ) -> PlatformResult<()> {
        self.write(
            "move channel",
            Method::PATCH,
            &format!("/guilds/{guild_id}/channels"),
            Some(json!([{ "id": channel_id, "position": position }])),
        )
        .await?;
        Ok(())
    }
}
