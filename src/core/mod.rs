//! Document handles, their path resolution and the disk they live on

pub mod config;
pub mod document;
pub mod file_system;
pub mod image_links;
pub mod kind;
pub mod location;
pub mod paths;
pub mod resolver;
