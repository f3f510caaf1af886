/// Database models
///
/// - `user`: user accounts and their public projection
/// - `organisation`: named groups of users
/// - `membership`: the many-to-many link between the two

pub mod membership;
pub mod organisation;
pub mod user;
