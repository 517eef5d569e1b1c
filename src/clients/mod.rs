pub mod edge_config;
pub mod github;
