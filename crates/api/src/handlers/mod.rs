pub mod admin;
pub mod credits;
pub mod generations;
pub mod webhooks;
