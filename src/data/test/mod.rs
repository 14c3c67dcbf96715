mod credential;
mod tracked_channel;
mod user_token;
