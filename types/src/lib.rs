pub mod api;
pub mod execution;
pub mod game;

pub use execution::NAMESPACE;
