pub mod forwarder;
pub mod token_cache;
