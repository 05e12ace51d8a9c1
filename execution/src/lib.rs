pub mod round;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;


mod layer;

mod state;

pub use layer::Layer;
pub use state::{nonce, Memory, PrepareError, State, Status};
