//! Dispatcher Integration Tests
//!
//! Drive the event dispatcher against an in-memory guild, the way the
//! gateway session does after decoding events.
//!
//! Run with: cargo test -p integration-tests --test dispatch_tests

use std::time::Duration;

use integration_tests::{message_from, standard_guild, InMemoryGuild, TestBot, GUILD_ID};
use robot_common::Environment;
use robot_core::{GuildMember, OverwriteKind, Permissions, PlatformEvent, Snowflake};
use robot_gateway::events::decode_dispatch;
use serde_json::json;

fn names(list: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = list.iter().map(ToString::to_string).collect();
    names.sort();
    names
}

// ============================================================================
// Startup Tests
// ============================================================================

#[tokio::test]
async fn test_startup_reconciles_every_member() {
    let (guild, channels) = standard_guild();
    let alice = guild.member("alice", &["Year 2022", "Year 2023"]);
    let bob = guild.member("bob", &["Year 2022", "Badge 2Y"]);
    let carol = guild.member("carol", &["Badge 1Y", "Member"]);
    let dan = guild.member("dan", &["Year 2023", "Badge 1Y"]);

    let bot = TestBot::start(guild, Environment::Development).unwrap();
    bot.connect().await;

    assert_eq!(
        bot.guild.role_names(alice.user_id),
        names(&["Year 2022", "Year 2023", "Badge 2Y"])
    );
    assert_eq!(
        bot.guild.role_names(bob.user_id),
        names(&["Year 2022", "Badge 1Y"])
    );
    assert_eq!(bot.guild.role_names(carol.user_id), names(&["Member"]));
    assert_eq!(
        bot.guild.role_names(dan.user_id),
        names(&["Year 2023", "Badge 1Y"])
    );

    let status = bot.guild.posted(&channels.status);
    assert!(status.contains(&"Adding role Badge 2Y to alice".to_string()));
    assert!(status.contains(&"Removing roles Badge 2Y from bob".to_string()));
    assert!(status.contains(&"Removing roles Badge 1Y from carol".to_string()));
    assert!(!status.iter().any(|line| line.contains("dan")));

    assert_eq!(bot.dispatcher.state().cached_members(), 4);
}

#[tokio::test]
async fn test_startup_without_status_channel_still_reconciles() {
    let guild = InMemoryGuild::new(GUILD_ID);
    guild.role("Year 2022");
    guild.role("Badge 1Y");
    let erin = guild.member("erin", &["Year 2022"]);

    let bot = TestBot::start(guild, Environment::Development).unwrap();
    bot.connect().await;

    assert_eq!(
        bot.guild.role_names(erin.user_id),
        names(&["Year 2022", "Badge 1Y"])
    );
    assert_eq!(bot.dispatcher.context().known_channels().status, None);
}

#[tokio::test]
async fn test_events_for_other_guilds_are_ignored() {
    let (guild, _) = standard_guild();
    let alice = guild.member("alice", &["Year 2022"]);
    let bot = TestBot::start(guild, Environment::Development).unwrap();

    bot.send(PlatformEvent::GuildAvailable {
        guild_id: Snowflake::new(4242),
    })
    .await;

    let stranger = GuildMember::new(Snowflake::new(4242), alice.user_id, "alice");
    bot.send(PlatformEvent::MemberUpdate(stranger)).await;

    assert_eq!(bot.guild.write_count(), 0);
    assert_eq!(bot.guild.role_names(alice.user_id), names(&["Year 2022"]));
}

// ============================================================================
// Member Update Tests
// ============================================================================

#[tokio::test]
async fn test_new_year_role_upgrades_badge() {
    let (guild, channels) = standard_guild();
    let alice = guild.member("alice", &["Year 2022"]);
    let bot = TestBot::start(guild, Environment::Development).unwrap();
    bot.connect().await;
    assert_eq!(
        bot.guild.role_names(alice.user_id),
        names(&["Year 2022", "Badge 1Y"])
    );

    let updated = bot.guild.grant(alice.user_id, "Year 2023");
    bot.send(PlatformEvent::MemberUpdate(updated)).await;

    assert_eq!(
        bot.guild.role_names(alice.user_id),
        names(&["Year 2022", "Year 2023", "Badge 2Y"])
    );
    let status = bot.guild.posted(&channels.status);
    assert!(status.contains(&"Removing roles Badge 1Y from alice".to_string()));
}

#[tokio::test]
async fn test_update_without_year_change_is_ignored() {
    let (guild, _) = standard_guild();
    let alice = guild.member("alice", &["Year 2022"]);
    let bot = TestBot::start(guild, Environment::Development).unwrap();
    bot.connect().await;
    let writes = bot.guild.write_count();

    // A moderator hands out an unrelated role
    let updated = bot.guild.grant(alice.user_id, "Member");
    bot.send(PlatformEvent::MemberUpdate(updated)).await;

    assert_eq!(bot.guild.write_count(), writes);
}

#[tokio::test]
async fn test_update_for_uncached_member_reconciles() {
    let (guild, _) = standard_guild();
    let bot = TestBot::start(guild, Environment::Development).unwrap();
    bot.connect().await;

    // Joined while the member cache was being seeded
    let late = bot.guild.member("late", &["Year 2022", "Year 2023"]);
    bot.send(PlatformEvent::MemberUpdate(late.clone())).await;

    assert_eq!(
        bot.guild.role_names(late.user_id),
        names(&["Year 2022", "Year 2023", "Badge 2Y"])
    );
}

// ============================================================================
// Join Tests
// ============================================================================

#[tokio::test]
async fn test_join_through_invite_grants_role() {
    let (guild, channels) = standard_guild();
    guild.set_invite("teamA01", &channels.team_a, 3);
    guild.set_invite("teamB01", &channels.team_b, 0);
    let bot = TestBot::start(guild, Environment::Development).unwrap();
    bot.connect().await;

    let dave = bot.guild.member("dave", &[]);
    bot.guild.set_invite("teamA01", &channels.team_a, 4);
    bot.send(PlatformEvent::MemberJoin(dave.clone())).await;

    assert_eq!(bot.guild.role_names(dave.user_id), names(&["Team A"]));
    let status = bot.guild.posted(&channels.status);
    assert!(status.contains(&"dave assigned the role \"team-a\".".to_string()));
    assert_eq!(
        bot.dispatcher.state().invite_uses(GUILD_ID, "teamA01"),
        Some(4)
    );
}

#[tokio::test]
async fn test_join_with_missing_role_is_reported() {
    let (guild, channels) = standard_guild();
    guild.set_invite("teamB01", &channels.team_b, 0);
    let bot = TestBot::start(guild, Environment::Development).unwrap();
    bot.connect().await;

    let erin = bot.guild.member("erin", &[]);
    bot.guild.set_invite("teamB01", &channels.team_b, 1);
    bot.send(PlatformEvent::MemberJoin(erin.clone())).await;

    assert!(bot.guild.role_names(erin.user_id).is_empty());
    let status = bot.guild.posted(&channels.status);
    assert!(status.contains(&"Aborted: Could not find the role Team B.".to_string()));
}

#[tokio::test]
async fn test_join_before_invite_snapshot_grants_nothing() {
    let (guild, channels) = standard_guild();
    guild.set_invite("teamA01", &channels.team_a, 5);
    let bot = TestBot::start(guild, Environment::Development).unwrap();

    // No GUILD_CREATE yet, so there are no counters to compare against
    let gina = bot.guild.member("gina", &[]);
    bot.send(PlatformEvent::MemberJoin(gina.clone())).await;

    assert!(bot.guild.role_names(gina.user_id).is_empty());
    assert_eq!(
        bot.dispatcher.state().invite_uses(GUILD_ID, "teamA01"),
        Some(5)
    );

    let hank = bot.guild.member("hank", &[]);
    bot.guild.set_invite("teamA01", &channels.team_a, 6);
    bot.send(PlatformEvent::MemberJoin(hank.clone())).await;

    assert_eq!(bot.guild.role_names(hank.user_id), names(&["Team A"]));
}

#[tokio::test]
async fn test_join_without_invite_change_still_reconciles() {
    let (guild, channels) = standard_guild();
    guild.set_invite("teamA01", &channels.team_a, 2);
    let bot = TestBot::start(guild, Environment::Development).unwrap();
    bot.connect().await;

    // Returning member who kept their year roles, joined through a vanity URL
    let frank = bot.guild.member("frank", &["Year 2022"]);
    bot.send(PlatformEvent::MemberJoin(frank.clone())).await;

    assert_eq!(
        bot.guild.role_names(frank.user_id),
        names(&["Year 2022", "Badge 1Y"])
    );
}

// ============================================================================
// Doorbell Tests
// ============================================================================

#[tokio::test]
async fn test_member_rings_doorbell() {
    let (guild, channels) = standard_guild();
    let member = guild.member("gina", &["Member"]);
    let bot = TestBot::start(guild, Environment::Production).unwrap();
    bot.connect().await;

    let message = message_from(&member, &channels.doorbell, "open please");
    bot.send(PlatformEvent::MessageCreate(message)).await;

    assert_eq!(bot.relay.pulses(), vec![(17, Duration::from_millis(500))]);
    assert_eq!(
        bot.guild.posted(&channels.doorbell),
        vec!["The door is open.".to_string()]
    );
}

#[tokio::test]
async fn test_non_member_cannot_ring() {
    let (guild, channels) = standard_guild();
    let visitor = guild.member("hank", &[]);
    let bot = TestBot::start(guild, Environment::Production).unwrap();
    bot.connect().await;

    let message = message_from(&visitor, &channels.doorbell, "hello?");
    bot.send(PlatformEvent::MessageCreate(message)).await;

    assert!(bot.relay.pulses().is_empty());
    assert_eq!(
        bot.guild.posted(&channels.doorbell),
        vec!["Only members can ring.".to_string()]
    );
}

#[tokio::test]
async fn test_doorbell_disabled_in_development() {
    let (guild, channels) = standard_guild();
    let member = guild.member("gina", &["Member"]);
    let bot = TestBot::start(guild, Environment::Development).unwrap();
    bot.connect().await;

    let message = message_from(&member, &channels.doorbell, "open please");
    bot.send(PlatformEvent::MessageCreate(message)).await;

    assert!(bot.relay.pulses().is_empty());
    assert_eq!(
        bot.guild.posted(&channels.doorbell),
        vec![robot_service::DEBUG_MODE_REPLY.to_string()]
    );
}

#[tokio::test]
async fn test_doorbell_ignores_other_channels() {
    let (guild, channels) = standard_guild();
    let member = guild.member("gina", &["Member"]);
    let bot = TestBot::start(guild, Environment::Production).unwrap();
    bot.connect().await;

    let message = message_from(&member, &channels.team_a, "open please");
    bot.send(PlatformEvent::MessageCreate(message)).await;

    assert!(bot.relay.pulses().is_empty());
    assert!(bot.guild.posted(&channels.team_a).is_empty());
}

// ============================================================================
// Edition Command Tests
// ============================================================================

#[tokio::test]
async fn test_admin_provisions_edition() {
    let (guild, channels) = standard_guild();
    let admin = guild.member("ivy", &["Admin"]);
    let bot = TestBot::start(guild, Environment::Development).unwrap();
    bot.connect().await;

    let message = message_from(&admin, &channels.status, "!edition 2024");
    bot.send(PlatformEvent::MessageCreate(message)).await;

    let year_role = bot.guild.find_role("Year 2024").expect("year role created");
    let organizer = bot.guild.find_role("Organizer").unwrap();
    let category = bot
        .guild
        .find_channel("Edition 2024")
        .expect("category created");
    assert!(category.is_category());

    let everyone = category
        .permission_overwrites
        .iter()
        .find(|o| o.id == GUILD_ID)
        .expect("@everyone overwrite");
    assert_eq!(everyone.kind, OverwriteKind::Role);
    assert!(everyone.deny.contains(Permissions::VIEW_CHANNEL));

    let children = bot.guild.children(category.id);
    let mut child_names: Vec<String> = children.iter().map(|c| c.name_or_id()).collect();
    child_names.sort();
    assert_eq!(child_names, names(&["announcements", "general"]));

    let general = children.iter().find(|c| c.is_named("general")).unwrap();
    assert!(general.permission_overwrites.is_empty());
    assert_eq!(general.topic.as_deref(), Some("Everything"));

    let announcements = children
        .iter()
        .find(|c| c.is_named("announcements"))
        .unwrap();
    let year = announcements
        .permission_overwrites
        .iter()
        .find(|o| o.id == year_role.id)
        .expect("year overwrite");
    assert!(year.allow.contains(Permissions::VIEW_CHANNEL));
    assert!(year.deny.contains(Permissions::SEND_MESSAGES));
    let organizer = announcements
        .permission_overwrites
        .iter()
        .find(|o| o.id == organizer.id)
        .expect("organizer overwrite");
    assert!(organizer
        .allow
        .contains(Permissions::SEND_MESSAGES | Permissions::MANAGE_MESSAGES));

    let status = bot.guild.posted(&channels.status);
    assert!(status.contains(&"Role Year 2024 created.".to_string()));
    assert!(status.contains(&"Category Edition 2024 created.".to_string()));
    assert!(status.contains(&"Channel general in Edition 2024 created.".to_string()));
}

#[tokio::test]
async fn test_edition_command_twice_updates_channels() {
    let (guild, channels) = standard_guild();
    let admin = guild.member("ivy", &["Admin"]);
    let bot = TestBot::start(guild, Environment::Development).unwrap();
    bot.connect().await;

    for _ in 0..2 {
        let message = message_from(&admin, &channels.status, "!edition 2024");
        bot.send(PlatformEvent::MessageCreate(message)).await;
    }

    let category = bot.guild.find_channel("Edition 2024").unwrap();
    assert_eq!(bot.guild.children(category.id).len(), 2);
    let status = bot.guild.posted(&channels.status);
    assert!(status.contains(&"Role Year 2024 already exists.".to_string()));
    assert!(status.contains(&"Channel announcements in Edition 2024 updated.".to_string()));
}

#[tokio::test]
async fn test_edition_command_requires_admin() {
    let (guild, channels) = standard_guild();
    let member = guild.member("jack", &["Member"]);
    let bot = TestBot::start(guild, Environment::Development).unwrap();
    bot.connect().await;
    let writes = bot.guild.write_count();

    let message = message_from(&member, &channels.status, "!edition 2024");
    bot.send(PlatformEvent::MessageCreate(message)).await;

    assert!(bot.guild.find_role("Year 2024").is_none());
    assert_eq!(bot.guild.write_count(), writes);
}

// ============================================================================
// Decoded Gateway Payload Tests
// ============================================================================

#[tokio::test]
async fn test_decoded_member_update_reaches_services() {
    let (guild, _) = standard_guild();
    let kim = guild.member("kim", &[]);
    let bot = TestBot::start(guild, Environment::Development).unwrap();
    bot.connect().await;

    let updated = bot.guild.grant(kim.user_id, "Year 2023");
    let payload = json!({
        "guild_id": GUILD_ID.to_string(),
        "user": {"id": kim.user_id.to_string(), "username": "kim"},
        "roles": updated.role_ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "joined_at": "2024-01-01T00:00:00+00:00"
    });
    let event = decode_dispatch("GUILD_MEMBER_UPDATE", payload)
        .unwrap()
        .expect("handled event");
    bot.send(event).await;

    assert_eq!(
        bot.guild.role_names(kim.user_id),
        names(&["Year 2023", "Badge 1Y"])
    );
}
