pub mod app;
pub mod config;
pub mod descriptor;
pub mod invoke;
pub mod shared;
pub mod workspace;
