mod match_event;
mod reminder;
mod status;

pub mod dtos {
    pub use crate::match_event::dtos::*;
    pub use crate::reminder::dtos::*;
}

pub use crate::match_event::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;
