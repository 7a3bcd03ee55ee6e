//! # Inkwell Core
//!
//! The domain layer of the Inkwell blog backend.
//! This crate contains the content graph model, the engagement engine, the
//! comment thread projection and the authorization policy. Storage, clocks and
//! identity are reached only through the traits in [`ports`].

pub mod cascade;
pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod services;
pub mod thread;

pub use error::{DomainError, RepoError};
pub use policy::{Action, Actor, Decision};
