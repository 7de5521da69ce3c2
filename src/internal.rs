pub mod chunk;
pub mod config;
pub mod http;
pub mod merger;
pub mod sink;
pub(crate) mod states;
