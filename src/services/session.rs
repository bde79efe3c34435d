use std::sync::{Arc, PoisonError, RwLock};

use tracing::{error, info, warn};

use crate::{
    error::{AppError, StorageError},
    models::session::{Session, SessionState},
    services::kv::SharedKv,
};

pub const USER_NAME_KEY: &str = "userName";
pub const USER_EMAIL_KEY: &str = "userEmail";
pub const USER_PASSWORD_KEY: &str = "userPassword";

const SESSION_KEYS: [&str; 3] = [USER_NAME_KEY, USER_EMAIL_KEY, USER_PASSWORD_KEY];

/// Holds the current sign-in state in memory and mirrors it to the key-value store.
///
/// Memory is updated first so readers observe login/logout immediately; persistence
/// follows and its failures are logged rather than returned.
#[derive(Clone)]
pub struct SessionStore {
    kv: SharedKv,
    state: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    pub fn new(kv: SharedKv) -> Self {
        Self {
            kv,
            state: Arc::new(RwLock::new(SessionState::Anonymous)),
        }
    }

    /// Reads the persisted session. Any read failure counts as signed out.
    pub async fn load_session(&self) -> Option<Session> {
        match self.read_persisted().await {
            Ok(session) => session,
            Err(err) => {
                warn!("failed to load session, starting signed out: {err}");
                None
            }
        }
    }

    /// Loads the persisted session into memory. Call once before serving.
    pub async fn restore(&self) -> Option<Session> {
        let session = self.load_session().await;
        match &session {
            Some(session) => info!(email = %session.email, "restored session"),
            None => info!("no stored session"),
        }
        self.set_state(
            session
                .clone()
                .map_or(SessionState::Anonymous, SessionState::Authenticated),
        );
        session
    }

    pub fn current(&self) -> Option<Session> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .session()
            .cloned()
    }

    /// Signs in. Only password hashing can fail; persistence errors are logged.
    pub async fn login(&self, name: &str, email: &str, password: &str) -> Result<Session, AppError> {
        let session = Session::new(name, email, password)?;
        self.set_state(SessionState::Authenticated(session.clone()));

        if let Err(err) = self.persist(&session).await {
            error!(email = %session.email, "session kept in memory but not persisted: {err}");
        } else {
            info!(email = %session.email, "signed in");
        }
        Ok(session)
    }

    pub async fn logout(&self) {
        self.set_state(SessionState::Anonymous);

        if let Err(err) = self.kv.multi_remove(&SESSION_KEYS).await {
            error!("signed out in memory but stored session was not removed: {err}");
        } else {
            info!("signed out");
        }
    }

    fn set_state(&self, next: SessionState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    async fn read_persisted(&self) -> Result<Option<Session>, StorageError> {
        let name = self.kv.get(USER_NAME_KEY).await?;
        let email = self.kv.get(USER_EMAIL_KEY).await?;
        let password = self.kv.get(USER_PASSWORD_KEY).await?;

        let session = match (name, email, password) {
            (Some(name), Some(email), Some(password))
                if !name.is_empty() && !email.is_empty() && !password.is_empty() =>
            {
                Some(Session {
                    name,
                    email,
                    password,
                })
            }
            _ => None,
        };
        Ok(session)
    }

    async fn persist(&self, session: &Session) -> Result<(), StorageError> {
        self.kv.set(USER_NAME_KEY, &session.name).await?;
        self.kv.set(USER_EMAIL_KEY, &session.email).await?;
        self.kv.set(USER_PASSWORD_KEY, &session.password).await?;
        Ok(())
    }
}
