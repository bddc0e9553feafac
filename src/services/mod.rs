pub mod completion;
pub mod prompt;
pub mod rate_limiter;
