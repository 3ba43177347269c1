pub mod cancel;
pub mod log_throttle;
pub mod logger;
