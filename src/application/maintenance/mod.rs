//! Background maintenance tasks

pub mod sweeper;

pub use sweeper::start_state_sweeper;
