mod retry;

pub use retry::retry_with_backoff;
