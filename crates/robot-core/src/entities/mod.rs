//! Domain entities - core business objects

mod channel;
mod guild;
mod invite;
mod member;
mod message;
mod role;

pub use channel::{Channel, ChannelType, OverwriteKind, PermissionOverwrite};
pub use guild::GuildRoles;
pub use invite::{find_used_invite, snapshot_invite_uses, Invite, InviteUses};
pub use member::GuildMember;
pub use message::{Message, MessageAuthor};
pub use role::Role;
