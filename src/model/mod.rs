pub mod credential;
pub mod deployment;
pub mod membership;
pub mod roster;
pub mod storage;
pub mod tracked_channel;
