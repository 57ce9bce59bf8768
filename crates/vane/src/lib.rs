pub mod agent;
pub mod errors;
pub mod models;
pub mod providers;
pub mod toolset;
pub mod weather;
