pub mod config;
pub mod dify;
pub mod menu;
pub mod shared;
pub mod workflow;
