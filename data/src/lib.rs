pub use self::config::Config;
pub use self::message::Message;
pub use self::notification::Notification;

pub mod audio;
pub mod config;
pub mod environment;
pub mod history;
pub mod log;
pub mod message;
pub mod notification;
pub mod palette;
pub mod search;
