//! Command execution and the control loop

pub mod controller;
pub mod handlers;
pub mod registration;
pub mod reply;

pub use controller::Controller;
pub use handlers::DispatchError;
pub use registration::{RegistrationWait, WaitPoll};
pub use reply::{reply, reply_fmt, CRLF};
