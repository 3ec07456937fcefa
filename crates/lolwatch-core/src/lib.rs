// Library root: live session display client. Connects to the report server,
// sends the identity line once, and projects each inbound report onto a
// display surface.

pub mod client;
pub mod config;
pub mod display;
pub mod protocol;
pub mod report;
pub mod session;
