//! Edition service
//!
//! Provisions everything a new yearly program edition needs: the year role,
//! a category placed above the previous editions, and the configured text
//! channels with their permission overwrites.
//!
//! Running the command twice for the same year reuses the role and the
//! category and updates the channels in place.

use robot_common::{ChannelTemplate, PermissionEntry};
use robot_core::{
    Channel, ChannelEdit, DomainError, GuildRoles, NewChannel, PermissionOverwrite, Permissions,
    Role, Snowflake,
};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::status::StatusLog;

/// Role name that always means the guild's default role
pub const EVERYONE: &str = "@everyone";

/// What a provisioning run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionReport {
    pub year_role: Role,
    pub category: Channel,
    pub created: Vec<String>,
    pub updated: Vec<String>,
}

/// Edition service
pub struct EditionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EditionService<'a> {
    /// Create a new EditionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Provision the role, category and channels for `year`
    ///
    /// # Errors
    /// A role named in a permission entry that does not exist aborts the run
    /// before the category is touched. Platform rejections abort the run
    /// where they happen; nothing is rolled back.
    #[instrument(skip(self))]
    pub async fn provision(&self, guild_id: Snowflake, year: u16) -> ServiceResult<EditionReport> {
        let edition = self
            .ctx
            .config()
            .settings
            .edition
            .as_ref()
            .ok_or_else(|| ServiceError::validation("edition provisioning is not configured"))?;
        let status = StatusLog::new(self.ctx);

        let year_role = self.ensure_year_role(guild_id, year).await?;

        let roles = GuildRoles::new(guild_id, self.ctx.platform().guild_roles(guild_id).await?);
        let targets = OverwriteTargets {
            roles: &roles,
            year_prefix: self.ctx.affixes().year_prefix(),
            year_role: &year_role,
        };
        let plans = match plan_overwrites(&targets, &edition.category_permissions, &edition.channels)
        {
            Ok(plans) => plans,
            Err(e) => {
                status.warn(&format!("Aborted: {e}.")).await;
                return Err(e.into());
            }
        };

        let category = self
            .ensure_category(guild_id, &edition.category_prefix, year, &plans.category)
            .await?;

        let channels = self.ctx.platform().guild_channels(guild_id).await?;
        let mut report = EditionReport {
            year_role,
            category,
            created: Vec::new(),
            updated: Vec::new(),
        };
        for (template, overwrites) in edition.channels.iter().zip(plans.channels) {
            let existing = channels.iter().find(|channel| {
                channel.is_text()
                    && channel.parent_id == Some(report.category.id)
                    && channel.is_named(&template.name)
            });
            let category_label = report.category.name_or_id();

            match existing {
                Some(channel) => {
                    status
                        .info(&format!(
                            "Channel {} in {category_label} updated.",
                            template.name
                        ))
                        .await;
                    let edit = ChannelEdit {
                        topic: Some(template.topic.clone()),
                        permission_overwrites: overwrites,
                    };
                    self.ctx.platform().edit_channel(channel.id, &edit).await?;
                    report.updated.push(template.name.clone());
                }
                None => {
                    status
                        .info(&format!(
                            "Channel {} in {category_label} created.",
                            template.name
                        ))
                        .await;
                    let new_channel = NewChannel {
                        name: template.name.clone(),
                        topic: Some(template.topic.clone()),
                        category: false,
                        parent_id: Some(report.category.id),
                        permission_overwrites: overwrites,
                    };
                    self.ctx.platform().create_channel(guild_id, &new_channel).await?;
                    report.created.push(template.name.clone());
                }
            }
        }

        info!(
            guild_id = %guild_id,
            year,
            created = report.created.len(),
            updated = report.updated.len(),
            "Edition provisioned"
        );
        Ok(report)
    }

    /// Reuse or create the year role and rank it above the oldest year role
    async fn ensure_year_role(&self, guild_id: Snowflake, year: u16) -> ServiceResult<Role> {
        let platform = self.ctx.platform();
        let status = StatusLog::new(self.ctx);
        let year_prefix = self.ctx.affixes().year_prefix();
        let name = format!("{year_prefix} {year}");

        let roles = GuildRoles::new(guild_id, platform.guild_roles(guild_id).await?);
        let mut year_role = match roles.find_by_name(&name) {
            Some(role) => {
                status.info(&format!("Role {name} already exists.")).await;
                role.clone()
            }
            None => {
                let role = platform.create_role(guild_id, &name).await?;
                status.info(&format!("Role {name} created.")).await;
                role
            }
        };

        let roles = GuildRoles::new(guild_id, platform.guild_roles(guild_id).await?);
        if let Some(previous) = roles.first_with_prefix(year_prefix, Some(year_role.id)) {
            let position = position_above(&year_role, previous);
            platform.move_role(guild_id, year_role.id, position).await?;
            year_role.position = position;
            status
                .info(&format!("Moved role {name} below the other year roles."))
                .await;
        }

        Ok(year_role)
    }

    /// Reuse or create the category and place it before the previous editions
    async fn ensure_category(
        &self,
        guild_id: Snowflake,
        prefix: &str,
        year: u16,
        overwrites: &[PermissionOverwrite],
    ) -> ServiceResult<Channel> {
        let platform = self.ctx.platform();
        let status = StatusLog::new(self.ctx);
        let name = format!("{prefix} {year}");

        let channels = platform.guild_channels(guild_id).await?;
        let mut category = match channels
            .iter()
            .find(|channel| channel.is_category() && channel.is_named(&name))
        {
            Some(category) => {
                status.info(&format!("Category {name} already exists.")).await;
                category.clone()
            }
            None => {
                let new_category = NewChannel {
                    name: name.clone(),
                    category: true,
                    permission_overwrites: overwrites.to_vec(),
                    ..NewChannel::default()
                };
                let category = platform.create_channel(guild_id, &new_category).await?;
                status.info(&format!("Category {name} created.")).await;
                category
            }
        };

        let channels = platform.guild_channels(guild_id).await?;
        if let Some(previous) = first_category_with_prefix(&channels, prefix, category.id) {
            let position = position_before(&category, previous);
            platform.move_channel(guild_id, category.id, position).await?;
            category.position = position;
            status
                .info(&format!(
                    "Moved category {name} above the other year categories."
                ))
                .await;
        }

        Ok(category)
    }
}

/// Resolves the role names used in permission entries
struct OverwriteTargets<'r> {
    roles: &'r GuildRoles,
    year_prefix: &'r str,
    year_role: &'r Role,
}

impl OverwriteTargets<'_> {
    fn resolve(&self, name: &str) -> Result<Snowflake, DomainError> {
        if name == EVERYONE {
            return Ok(self
                .roles
                .default_role()
                .map_or(self.roles.guild_id(), |role| role.id));
        }
        // Any name with the year prefix stands for the edition being provisioned
        if name.starts_with(self.year_prefix) {
            return Ok(self.year_role.id);
        }
        self.roles
            .find_by_name(name)
            .map(|role| role.id)
            .ok_or_else(|| DomainError::RoleNotFound(name.to_string()))
    }
}

struct OverwritePlan {
    category: Vec<PermissionOverwrite>,
    channels: Vec<Vec<PermissionOverwrite>>,
}

fn plan_overwrites(
    targets: &OverwriteTargets<'_>,
    category_entries: &[PermissionEntry],
    templates: &[ChannelTemplate],
) -> Result<OverwritePlan, DomainError> {
    let category = build_overwrites(targets, &[], category_entries)?;
    let channels: Vec<Vec<PermissionOverwrite>> = templates
        .iter()
        .map(|template| build_overwrites(targets, &category, &template.permissions))
        .collect::<Result<_, _>>()?;
    Ok(OverwritePlan { category, channels })
}

/// Apply permission entries on top of a copy of `inherited`
///
/// No entries means the channel keeps syncing with its category, which the
/// platform expresses as an empty overwrite list.
fn build_overwrites(
    targets: &OverwriteTargets<'_>,
    inherited: &[PermissionOverwrite],
    entries: &[PermissionEntry],
) -> Result<Vec<PermissionOverwrite>, DomainError> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let mut overwrites = inherited.to_vec();
    for entry in entries {
        let role_id = targets.resolve(&entry.role)?;
        let allow = Permissions::from_names(&entry.add).map_err(DomainError::UnknownPermission)?;
        let deny = Permissions::from_names(&entry.remove).map_err(DomainError::UnknownPermission)?;

        let index = match overwrites.iter().position(|o| o.id == role_id) {
            Some(index) => index,
            None => {
                overwrites.push(PermissionOverwrite::role(role_id));
                overwrites.len() - 1
            }
        };
        overwrites[index].grant(allow);
        overwrites[index].revoke(deny);
    }
    Ok(overwrites)
}

/// Position that puts `moving` directly above `anchor`
///
/// When moving up, the anchor slides down one slot and `moving` takes its old
/// position.
fn position_above(moving: &Role, anchor: &Role) -> i32 {
    if moving.position < anchor.position {
        anchor.position
    } else {
        anchor.position + 1
    }
}

/// Position that lists `moving` directly before `anchor`
fn position_before(moving: &Channel, anchor: &Channel) -> i32 {
    if moving.position > anchor.position {
        anchor.position
    } else {
        (anchor.position - 1).max(0)
    }
}

fn first_category_with_prefix<'c>(
    channels: &'c [Channel],
    prefix: &str,
    ignored: Snowflake,
) -> Option<&'c Channel> {
    channels
        .iter()
        .filter(|channel| {
            channel.is_category()
                && channel.id != ignored
                && channel.name.as_deref().is_some_and(|name| name.starts_with(prefix))
        })
        .min_by_key(|channel| (channel.position, channel.id))
}
