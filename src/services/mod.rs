pub mod kv;
pub mod session;
pub mod trips;
