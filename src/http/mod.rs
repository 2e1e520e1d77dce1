pub mod error;
mod page;
pub mod server;
