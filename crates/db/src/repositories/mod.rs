//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Every read appends the
//! [`LIVE`](crate::models::record_status::LIVE) predicate, and every failed
//! query is logged with its operation name before the error is returned.

pub mod achievement_repo;
pub mod city_repo;
pub mod lookup_repo;
pub mod organization_help_type_repo;
pub mod organization_owner_repo;
pub mod organization_repo;
pub mod progress_update_repo;
pub mod quest_repo;
pub mod region_repo;
pub mod ticket_repo;
pub mod user_quest_repo;
pub mod user_repo;

pub use achievement_repo::AchievementRepo;
pub use city_repo::CityRepo;
pub use lookup_repo::LookupRepo;
pub use organization_help_type_repo::OrganizationHelpTypeRepo;
pub use organization_owner_repo::OrganizationOwnerRepo;
pub use organization_repo::OrganizationRepo;
pub use progress_update_repo::ProgressUpdateRepo;
pub use quest_repo::QuestRepo;
pub use region_repo::RegionRepo;
pub use ticket_repo::TicketRepo;
pub use user_quest_repo::UserQuestRepo;
pub use user_repo::UserRepo;
