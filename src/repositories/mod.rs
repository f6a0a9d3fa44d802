pub mod account_repository;
pub mod contribution_repository;
pub mod group_repository;
pub mod member_repository;
pub mod registry_repository;

// Re-export all repositories for convenient access
pub use account_repository::AccountRepository;
pub use contribution_repository::ContributionRepository;
pub use group_repository::GroupRepository;
pub use member_repository::MemberRepository;
pub use registry_repository::RegistryRepository;
