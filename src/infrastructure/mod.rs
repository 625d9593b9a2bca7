pub mod feeds;
pub mod notifications;
