pub mod error;
pub mod interfaces;
pub mod precision;
pub mod recluster;
pub mod render;
pub mod service;
pub mod viewport;
