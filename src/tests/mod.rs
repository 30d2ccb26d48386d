pub mod common;
mod token_endpoint;
