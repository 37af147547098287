//! Shared test fixtures

pub mod mock_repos;

pub use mock_repos::MockStore;
