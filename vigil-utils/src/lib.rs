/// Embed colours and builders shared across commands.
pub mod embed;
/// Text helpers for user-supplied content and warning tallies.
pub mod formatting;
/// Button-driven embed pagination.
pub mod pagination;
/// Permission and role-hierarchy helpers.
pub mod permissions;
/// Timestamp rendering.
pub mod time;
