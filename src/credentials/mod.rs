//! Admin credential generation for back office bootstrap.

pub mod generator;

pub use generator::{
    generate_batch, generate_credentials, generate_password, validate_email, AdminCredentials,
    CredentialError, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
