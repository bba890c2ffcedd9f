//! Chat-bot façade: text commands over a Telegram webhook.

pub mod commands;
pub mod webhook;
