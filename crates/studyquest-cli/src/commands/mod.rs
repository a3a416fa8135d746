pub mod achievement;
pub mod config;
pub mod quest;
pub mod session;
pub mod stats;
pub mod timer;
pub mod xp;
