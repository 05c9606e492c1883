mod errors;

pub use errors::Error;

pub type SyncResult<T> = Result<T, Error>;
