pub use courier_macros::HttpError;

pub mod config;
pub mod error;
pub mod mail;
mod serve;

pub use config::EnvConfig;
pub use mail::{DispatchResult, MailDispatcher, MailRequest};
pub use serve::{serve, shutdown_signal};
