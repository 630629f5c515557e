pub mod cancels;
pub mod handoff;
pub mod mappings;
pub mod participants;
pub mod prizes;
pub mod raffle;

pub use cancels::cancels_config;
pub use handoff::handoff_config;
pub use mappings::mappings_config;
pub use participants::participants_config;
pub use prizes::prizes_config;
pub use raffle::raffle_config;
