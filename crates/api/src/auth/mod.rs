//! Credential handling for the identity gate.

pub mod password;
