//! HTTP façade: thin actix-web handlers over [`crate::roster::RosterService`].

pub mod errors;
pub mod health;
pub mod matches;
pub mod players;
pub mod routes;
