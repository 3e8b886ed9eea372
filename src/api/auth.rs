//! `/auth` endpoints and the local side of login/logout.

use imanage_api_types::{
    AuthResponse, CheckEmailRequest, CheckEmailResponse, LoginRequest, RegisterRequest,
};
use tracing::{info, warn};

use crate::domain::validation;

use super::client::{ApiClient, Backend, Request};
use super::error::ApiError;

impl ApiClient {
    /// Authenticate and store the returned token; re-arms the session-expired flow.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        validation::login(username, password)?;

        let request = Request::post(Backend::Console, &["auth", "login"])
            .anonymous()
            .json(&LoginRequest {
                username: username.trim().to_string(),
                password: password.to_string(),
            })?;
        let response: AuthResponse = self.call(request).await?;

        let token = response
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::decode("login response did not include a token"))?;
        self.session().set_token(token);
        info!(username = username.trim(), "logged in");
        Ok(response)
    }

    /// Create an account; the e-mail doubles as the username.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<AuthResponse, ApiError> {
        validation::registration(email, password, confirm)?;

        let email = email.trim();
        let request = Request::post(Backend::Console, &["auth", "register"])
            .anonymous()
            .json(&RegisterRequest {
                email: email.to_string(),
                password: password.to_string(),
                username: email.to_string(),
            })?;
        let response: AuthResponse = self.call(request).await?;

        match response.token.as_deref().filter(|token| !token.is_empty()) {
            Some(token) => {
                self.session().set_token(token);
                info!(email, "registered and logged in");
            }
            None => info!(email, "registered; log in to continue"),
        }
        Ok(response)
    }

    /// Whether an account exists for `email`. Lookup failures count as "no".
    pub async fn check_email(&self, email: &str) -> Result<bool, ApiError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::validation("email is required"));
        }

        let request = Request::post(Backend::Console, &["auth", "check-email"])
            .anonymous()
            .json(&CheckEmailRequest {
                email: email.to_string(),
            })?;
        match self.call::<CheckEmailResponse>(request).await {
            Ok(response) => Ok(response.exists),
            Err(err) => {
                warn!(error = %err, "email lookup failed");
                Ok(false)
            }
        }
    }

    pub fn logout(&self) {
        self.session().clear();
        info!("logged out");
    }
}
