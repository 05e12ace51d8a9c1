mod codec;
mod config;
mod constants;
mod history;
mod player;
mod session;
mod withdrawal;

pub use codec::{read_string, string_encode_size, write_string};
pub use config::*;
pub use constants::*;
pub use history::*;
pub use player::*;
pub use session::*;
pub use withdrawal::*;

#[cfg(test)]
mod tests;
