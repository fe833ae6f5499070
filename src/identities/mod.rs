//! User registration, profiles, and authentication.

pub mod domain;
pub mod http;
pub mod services;
