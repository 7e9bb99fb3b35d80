pub mod app;
pub mod model;
pub mod retriever;
pub mod service;
