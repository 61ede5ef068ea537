//! Directory service models

pub mod filter;
pub mod user;

// Re-export for convenience
pub use filter::{FilterField, FilterOption, FilterState, ROLE_FILTER_OPTIONS};
pub use user::{DirectoryFetch, DirectoryOrigin, DirectoryUser, NewUserRequest, Role, UserStatus};
