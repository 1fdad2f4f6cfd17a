//! Session use-cases: sign-in, registration, session restore, logout.
//!
//! Generic over [`AuthApi`] so the flows can be exercised against a stub
//! backend. The global busy flag is raised around backend calls exactly the
//! way the original surfaces did it (a plain boolean, so overlapping flows
//! trample each other's indicator).

use std::sync::Arc;

use tracing::debug;

use bowtique_client::{ApiError, AuthApi, AuthResponse, LoginRequest, RegisterRequest};
use bowtique_core::auth::TokenHolder;
use bowtique_core::session::{SessionStore, UserIdentity};

pub struct SessionUsecase<A: AuthApi> {
    auth: A,
    tokens: Arc<TokenHolder>,
    session: Arc<SessionStore>,
}

impl<A: AuthApi> SessionUsecase<A> {
    pub fn new(auth: A, tokens: Arc<TokenHolder>, session: Arc<SessionStore>) -> Self {
        Self {
            auth,
            tokens,
            session,
        }
    }

    /// Logs in, stores the returned token, and publishes the identity.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        self.session.set_loading(true);
        let result = self.auth.login(&request).await;
        self.session.set_loading(false);

        self.publish(result?)
    }

    /// Registers a new account; the backend signs the account in directly,
    /// so the token and identity are published the same way.
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserIdentity, ApiError> {
        self.session.set_loading(true);
        let result = self.auth.register(request).await;
        self.session.set_loading(false);

        self.publish(result?)
    }

    /// Re-derives the identity from a mirrored token at startup.
    ///
    /// No token means nothing to restore. A failing who-am-I call leaves the
    /// user unauthenticated without surfacing the error; on a 401 the
    /// gateway has already cleared the stale token.
    pub async fn restore_session(&self) -> Option<UserIdentity> {
        self.tokens.token()?;

        match self.auth.me().await {
            Ok(response) => {
                let identity = identity_from(&response);
                self.session.set_user(Some(identity.clone()));
                Some(identity)
            }
            Err(err) => {
                debug!(error = %err, "session restore failed, staying signed out");
                self.session.set_user(None);
                None
            }
        }
    }

    /// Clears the token, then the identity. Navigation stays with the caller.
    pub fn sign_out(&self) {
        self.session.logout(&self.tokens);
    }

    fn publish(&self, response: AuthResponse) -> Result<UserIdentity, ApiError> {
        if let Some(token) = &response.token {
            self.tokens.save_token(token);
        }
        let identity = identity_from(&response);
        self.session.set_user(Some(identity.clone()));
        Ok(identity)
    }
}

/// Maps an auth payload onto the session's identity snapshot.
fn identity_from(response: &AuthResponse) -> UserIdentity {
    UserIdentity {
        id: response.id.map(|id| id.to_string()),
        name: match (&response.first_name, &response.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            _ => None,
        },
        first_name: response.first_name.clone(),
        last_name: response.last_name.clone(),
        role: response.role.clone(),
    }
}
