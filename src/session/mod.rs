//! Rooms and concurrent access to running matches

pub mod handle;
pub mod registry;

pub use handle::MatchHandle;
pub use registry::{SessionRegistry, ROOM_ID_RANGE};
