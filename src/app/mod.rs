pub mod common;
pub mod handlers;
pub mod server;

pub use server::{build_router, run_server, AppState};
