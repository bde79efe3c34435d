pub mod session;
pub mod trip;
