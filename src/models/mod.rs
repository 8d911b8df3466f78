pub mod api;
pub mod chat;
pub mod outcome;

pub use outcome::Outcome;
