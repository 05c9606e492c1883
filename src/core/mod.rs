pub mod feed;
pub mod naming;
pub mod store;
