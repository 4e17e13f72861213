//! REST implementation of the remote data service ports
//!
//! One [`RestDataService`] implements every gateway of `agencydesk-core`
//! plus the audit sink, sharing a single [`ApiClient`] and session token.

use std::sync::Arc;

use agencydesk_core::{AuditSink, AuthGateway, ClientGateway, TaskGateway, UserGateway};
use agencydesk_domain::constants::{
    ROUTE_ACTIVITY_LOGS, ROUTE_AUTH_LOGIN, ROUTE_AUTH_LOGOUT, ROUTE_AUTH_RECOVER,
    ROUTE_AUTH_SESSION, ROUTE_AUTH_SIGNUP, ROUTE_CHANGE_LOGS, ROUTE_CLIENTS, ROUTE_ERROR_LOGS,
    ROUTE_TASKS, ROUTE_TASKS_COUNT_BY_CLIENT, ROUTE_TASKS_COUNT_BY_USER, ROUTE_USERS,
};
use agencydesk_domain::{
    ActivityLog, AgencyError, ApiConfig, ChangeLog, Client, EntityCount, ErrorLog, NewClient,
    NewTask, NewUserRecord, Password, Result, SignInResult, Task, User,
};
use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument};

use super::auth::SessionTokens;
use super::client::{ApiClient, ApiClientConfig};
use super::errors::ApiError;

#[derive(Deserialize)]
struct LoginResponse {
    user: User,
    token: String,
}

#[derive(Deserialize)]
struct RecoveryResponse {
    sent: bool,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a Password,
}

/// Profile update, with the password only present when it changes
#[derive(Serialize)]
struct UserUpdate<'a> {
    #[serde(flatten)]
    user: &'a User,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a Password>,
}

/// Remote data service over HTTP
pub struct RestDataService {
    api: ApiClient,
    tokens: Arc<SessionTokens>,
}

impl RestDataService {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let tokens = Arc::new(SessionTokens::new());
        let api = ApiClient::new(ApiClientConfig::from(config), tokens.clone())?;
        Ok(Self { api, tokens })
    }

    pub fn with_client(api: ApiClient, tokens: Arc<SessionTokens>) -> Self {
        Self { api, tokens }
    }

    /// Token of the session this service is acting for
    pub fn session_token(&self) -> Option<String> {
        self.tokens.current()
    }

    fn item(route: &str, id: &str) -> String {
        format!("{route}/{id}")
    }
}

#[async_trait]
impl UserGateway for RestDataService {
    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.api.get(ROUTE_USERS).await?)
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: NewUserRecord) -> Result<User> {
        Ok(self.api.post(ROUTE_USERS, &user).await?)
    }

    #[instrument(skip(self, user, password), fields(user_id = %user.id))]
    async fn update(&self, user: User, password: Option<Password>) -> Result<User> {
        let body = UserUpdate { user: &user, password: password.as_ref() };
        Ok(self.api.put(&Self::item(ROUTE_USERS, &user.id), &body).await?)
    }
}

#[async_trait]
impl ClientGateway for RestDataService {
    async fn list(&self) -> Result<Vec<Client>> {
        Ok(self.api.get(ROUTE_CLIENTS).await?)
    }

    async fn create(&self, client: NewClient) -> Result<Client> {
        Ok(self.api.post(ROUTE_CLIENTS, &client).await?)
    }

    #[instrument(skip(self, client), fields(client_id = %client.id))]
    async fn update(&self, client: Client) -> Result<Client> {
        Ok(self.api.put(&Self::item(ROUTE_CLIENTS, &client.id), &client).await?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<()> {
        Ok(self.api.delete(&Self::item(ROUTE_CLIENTS, id)).await?)
    }
}

#[async_trait]
impl TaskGateway for RestDataService {
    async fn list(&self) -> Result<Vec<Task>> {
        Ok(self.api.get(ROUTE_TASKS).await?)
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        Ok(self.api.post(ROUTE_TASKS, &task).await?)
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn update(&self, task: Task) -> Result<Task> {
        Ok(self.api.put(&Self::item(ROUTE_TASKS, &task.id), &task).await?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<()> {
        Ok(self.api.delete(&Self::item(ROUTE_TASKS, id)).await?)
    }

    async fn count_by_client(&self) -> Result<Vec<EntityCount>> {
        Ok(self.api.get(ROUTE_TASKS_COUNT_BY_CLIENT).await?)
    }

    async fn count_by_user(&self) -> Result<Vec<EntityCount>> {
        Ok(self.api.get(ROUTE_TASKS_COUNT_BY_USER).await?)
    }
}

#[async_trait]
impl AuthGateway for RestDataService {
    /// `404` means the email is unknown and `401` a wrong password. Any
    /// other failure is an error.
    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &Password) -> Result<SignInResult> {
        let body = Credentials { email, password };
        match self.api.post::<_, LoginResponse>(ROUTE_AUTH_LOGIN, &body).await {
            Ok(LoginResponse { user, token }) => {
                self.tokens.set(token.clone());
                info!(user_id = %user.id, "Authenticated against remote service");
                Ok(SignInResult::Authenticated { user, token })
            }
            Err(ApiError::NotFound(_)) => Ok(SignInResult::UnknownEmail),
            Err(ApiError::Auth { status: 401, .. }) => Ok(SignInResult::WrongPassword),
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self, profile), fields(email = %profile.email))]
    async fn sign_up(&self, profile: NewUserRecord) -> Result<User> {
        Ok(self.api.post(ROUTE_AUTH_SIGNUP, &profile).await?)
    }

    #[instrument(skip(self, token))]
    async fn sign_out(&self, token: &str) -> Result<()> {
        let result = self
            .api
            .post_with_token::<_, IgnoredAny>(ROUTE_AUTH_LOGOUT, &json!({}), token)
            .await;
        self.tokens.clear_if(token);
        match result {
            Ok(_) | Err(ApiError::Auth { .. }) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self, token))]
    async fn resume_session(&self, token: &str) -> Result<User> {
        let user: User = self.api.get_with_token(ROUTE_AUTH_SESSION, token).await.map_err(
            |err| match err {
                ApiError::NotFound(msg) => AgencyError::Auth(msg),
                other => AgencyError::from(other),
            },
        )?;
        self.tokens.set(token);
        debug!(user_id = %user.id, "Session resumed");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn send_password_recovery(&self, email: &str) -> Result<bool> {
        let body = json!({ "email": email });
        match self.api.post::<_, Option<RecoveryResponse>>(ROUTE_AUTH_RECOVER, &body).await {
            Ok(response) => Ok(response.map_or(true, |r| r.sent)),
            Err(ApiError::NotFound(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl AuditSink for RestDataService {
    async fn record_activity(&self, entry: &ActivityLog) -> Result<()> {
        self.api.post::<_, IgnoredAny>(ROUTE_ACTIVITY_LOGS, entry).await?;
        Ok(())
    }

    async fn record_error(&self, entry: &ErrorLog) -> Result<()> {
        self.api.post::<_, IgnoredAny>(ROUTE_ERROR_LOGS, entry).await?;
        Ok(())
    }

    async fn record_change(&self, entry: &ChangeLog) -> Result<()> {
        self.api.post::<_, IgnoredAny>(ROUTE_CHANGE_LOGS, entry).await?;
        Ok(())
    }
}
