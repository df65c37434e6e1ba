pub mod endpoint;
pub mod event;
pub mod health;
pub mod status;
pub mod webhook;
