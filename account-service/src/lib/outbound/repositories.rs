pub mod follow;
pub mod memory;
pub mod user;

pub use follow::PostgresFollowRepository;
pub use memory::InMemoryFollowRepository;
pub use memory::InMemoryUserRepository;
pub use user::PostgresUserRepository;
