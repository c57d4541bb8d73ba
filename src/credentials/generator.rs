//! Password and admin credential generation.
//!
//! Character selection and the final shuffle draw from the same RNG, which
//! is `OsRng` outside of tests. There is no second, weaker shuffle.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 12;
pub const MAX_PASSWORD_LENGTH: usize = 128;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{}";

const CLASSES: [&[u8]; 4] = [LOWERCASE, UPPERCASE, DIGITS, SYMBOLS];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("password length {0} is below the minimum of {min}", min = MIN_PASSWORD_LENGTH)]
    TooShort(usize),

    #[error("password length {0} exceeds the maximum of {max}", max = MAX_PASSWORD_LENGTH)]
    TooLong(usize),

    #[error("invalid email address '{0}'")]
    InvalidEmail(String),
}

/// Login for a back office account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

/// Random password with at least one lowercase, uppercase, digit and symbol.
pub fn generate_password(length: usize) -> Result<String, CredentialError> {
    generate_password_with(&mut OsRng, length)
}

pub(crate) fn generate_password_with<R: Rng>(rng: &mut R, length: usize) -> Result<String, CredentialError> {
    if length < MIN_PASSWORD_LENGTH {
        return Err(CredentialError::TooShort(length));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(CredentialError::TooLong(length));
    }

    let alphabet: Vec<u8> = CLASSES.concat();
    let mut chars: Vec<u8> = CLASSES.iter().map(|class| pick(rng, class)).collect();
    while chars.len() < length {
        chars.push(pick(rng, &alphabet));
    }
    chars.shuffle(rng);

    Ok(chars.into_iter().map(char::from).collect())
}

fn pick<R: Rng>(rng: &mut R, set: &[u8]) -> u8 {
    set[rng.gen_range(0..set.len())]
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(email: &str) -> Result<(), CredentialError> {
    let invalid = || CredentialError::InvalidEmail(email.to_string());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let well_formed = !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace);

    if well_formed {
        Ok(())
    } else {
        Err(invalid())
    }
}

pub fn generate_credentials(email: &str, length: usize) -> Result<AdminCredentials, CredentialError> {
    validate_email(email)?;

    Ok(AdminCredentials {
        email: email.to_string(),
        password: generate_password(length)?,
    })
}

/// `count` accounts named `{prefix}1@{domain}`, `{prefix}2@{domain}`, ...
pub fn generate_batch(
    prefix: &str,
    domain: &str,
    count: usize,
    length: usize,
) -> Result<Vec<AdminCredentials>, CredentialError> {
    (1..=count)
        .map(|i| generate_credentials(&format!("{prefix}{i}@{domain}"), length))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn has_class(password: &str, class: &[u8]) -> bool {
        password.bytes().any(|b| class.contains(&b))
    }

    #[test]
    fn test_password_shape() {
        for length in [MIN_PASSWORD_LENGTH, 20, MAX_PASSWORD_LENGTH] {
            let password = generate_password(length).unwrap();
            assert_eq!(password.len(), length);
            for class in CLASSES {
                assert!(has_class(&password, class), "{password} lacks a class");
            }
        }
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(generate_password(8), Err(CredentialError::TooShort(8)));
        assert_eq!(generate_password(500), Err(CredentialError::TooLong(500)));
    }

    #[test]
    fn test_required_classes_not_always_leading() {
        // With a fixed seed the shuffle must move the four guaranteed picks.
        let mut rng = StdRng::seed_from_u64(7);
        let moved = (0..20).any(|_| {
            let p = generate_password_with(&mut rng, 16).unwrap();
            !(LOWERCASE.contains(&p.as_bytes()[0]) && UPPERCASE.contains(&p.as_bytes()[1]))
        });
        assert!(moved);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_password_with(&mut StdRng::seed_from_u64(42), 24).unwrap();
        let b = generate_password_with(&mut StdRng::seed_from_u64(42), 24).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("ops@summit-treks.com").is_ok());
        for bad in ["", "ops", "@x.com", "ops@", "ops@localhost", "a@b@c.com", "ops @x.com", "ops@.com"] {
            assert!(validate_email(bad).is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn test_batch() {
        let batch = generate_batch("admin", "summit-treks.com", 3, 16).unwrap();
        let emails: Vec<_> = batch.iter().map(|c| c.email.as_str()).collect();
        assert_eq!(emails, ["admin1@summit-treks.com", "admin2@summit-treks.com", "admin3@summit-treks.com"]);
        assert_ne!(batch[0].password, batch[1].password);
    }
}
