pub mod catalog;
pub mod config;
pub mod cosine;
pub mod error;
pub mod intent;
pub mod normalize;
pub mod protocol;
pub mod recommender;
pub mod server;
pub mod transport;
pub mod types;
pub mod vector_space;
