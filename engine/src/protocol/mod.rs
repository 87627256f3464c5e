//! External order notation and visualiser payload shapes.

pub mod messages;
pub mod notation;

pub use messages::Message;
pub use notation::{format_order, parse_order, NotationError};
