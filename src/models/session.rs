use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use serde::Serialize;

use crate::error::AppError;

/// The signed-in identity. `password` holds an Argon2 PHC string, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Session {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
    ) -> Result<Self, AppError> {
        Ok(Self {
            name: name.into(),
            email: email.into(),
            password: hash_password(password)?,
        })
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        PasswordHash::new(&self.password)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(candidate.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    pub fn profile(&self) -> Profile {
        Profile {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// What the settings view shows about the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(session) => Some(session),
        }
    }
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::Password(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_is_kept_as_an_argon2_hash() {
        let session = Session::new("A", "a@x.com", "p").unwrap();
        assert_ne!(session.password, "p");
        assert!(session.password.starts_with("$argon2"));
        assert!(session.verify_password("p"));
        assert!(!session.verify_password("q"));
    }

    #[test]
    fn each_login_gets_a_fresh_salt() {
        let first = Session::new("A", "a@x.com", "p").unwrap();
        let second = Session::new("A", "a@x.com", "p").unwrap();
        assert_ne!(first.password, second.password);
    }
}
