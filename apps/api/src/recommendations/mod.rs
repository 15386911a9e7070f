pub mod generator;
pub mod handlers;
pub mod scoring;
pub mod selector;
pub mod store;
