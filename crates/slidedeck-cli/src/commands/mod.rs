pub mod ping;
pub mod seed;
pub mod server;
