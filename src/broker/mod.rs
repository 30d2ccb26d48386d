pub mod token_broker;
