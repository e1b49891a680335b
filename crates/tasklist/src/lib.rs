pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod protocol;
pub mod render;
pub mod runtime;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

/// Endpoint used when neither the config file, `TASKLIST_ENDPOINT`, nor a
/// command line flag names one.
pub const DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/AKfycbyTmF9mp4gTuuGZpwKIXtn8kIlsvUxcuR_uR4Z72G22o6QDwUz1ts6gCr5nuKkOBbfQ/exec";
