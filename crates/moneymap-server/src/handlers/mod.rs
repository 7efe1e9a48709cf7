//! API request handlers

mod credit;
mod goals;
mod missions;
mod reports;
mod users;

pub use credit::*;
pub use goals::*;
pub use missions::*;
pub use reports::*;
pub use users::*;
