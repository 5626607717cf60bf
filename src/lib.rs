pub mod catalog;
pub mod clock;
pub mod config;
pub mod events;
pub mod input;
pub mod shell;
pub mod state;
pub mod storage;
pub mod wallet;
