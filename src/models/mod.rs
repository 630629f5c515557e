pub mod cancels;
pub mod common;
pub mod handoff;
pub mod mapping;
pub mod participant;
pub mod prize;
pub mod raffle;

pub use cancels::*;
pub use common::*;
pub use handoff::*;
pub use mapping::*;
pub use participant::*;
pub use prize::*;
pub use raffle::*;
