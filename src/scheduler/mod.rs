pub mod channel_activity;
