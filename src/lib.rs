pub mod analysis;
pub mod config;
pub mod dynamics;
pub mod math;
pub mod output;
pub mod physics;
pub mod plotting;
pub mod state;
