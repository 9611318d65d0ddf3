//! Pitstop application: cart services, collaborators and configuration.

pub mod config;
pub mod context;
pub mod domain;
pub mod observability;

#[cfg(test)]
mod test;
