//! Seniority badges
//!
//! A member holds one "year" role per participation cycle and at most one
//! "badge" role summarizing them. The badge roles form a ladder: rung `i`
//! is the badge for `i` counted years, rung 0 is "no badge".
//!
//! The ladder is inferred from the guild's role order. The lowest ranked
//! badge role is the one-year badge, the next one up the two-year badge, and
//! so on; members with more years than rungs get the topmost badge.

mod ladder;

pub use ladder::{year_role_sequence, BadgeLadder, BadgePlan, RoleAffixes};
