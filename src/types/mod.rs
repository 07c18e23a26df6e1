//! Type definitions

pub mod bus;
pub mod driver;
pub mod messages;
pub mod place;
pub mod shift;

pub use bus::*;
pub use driver::*;
pub use messages::*;
pub use place::*;
pub use shift::*;
