//! HTTP RPC client for the user-data service.
//!
//! Each operation POSTs a JSON body to `{base_url}/rpc/{Method}` and gets
//! back a `{code, message, data?}` envelope. Requests are bounded by a
//! client-wide timeout configured at construction; a timeout or connect
//! failure is `Unavailable` and is never retried inside the request.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use usergate_auth::Role;

use super::{codes, DirectoryError, NewUserRecord, UserDirectory, UserInfoPatch, UserRecord};

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    code: u32,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

/// Shared client handle for the user-data service; constructed once at
/// startup and injected wherever the directory is needed.
#[derive(Clone)]
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserDirectory {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<RpcEnvelope<T>, DirectoryError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}/rpc/{}", self.base_url, method);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(method, error = %e, "cannot reach user-data service");
                DirectoryError::Unavailable(e.to_string())
            })?;

        response.json::<RpcEnvelope<T>>().await.map_err(|e| {
            tracing::error!(method, error = %e, "malformed user-data service response");
            DirectoryError::Backend {
                code: 0,
                message: format!("malformed response: {e}"),
            }
        })
    }

    /// Translate an ack-style envelope (no payload expected).
    fn ack(envelope: RpcEnvelope<serde_json::Value>) -> Result<(), DirectoryError> {
        match envelope.code {
            codes::OK => Ok(()),
            other => Err(Self::status_error(other, envelope.message)),
        }
    }

    fn status_error(code: u32, message: String) -> DirectoryError {
        match code {
            codes::NOT_FOUND => DirectoryError::NotFound,
            codes::USERNAME_TAKEN | codes::EMAIL_TAKEN | codes::PHONE_TAKEN => {
                DirectoryError::Conflict { code, message }
            }
            _ => DirectoryError::Backend { code, message },
        }
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn get_user(&self, username: &str) -> Result<UserRecord, DirectoryError> {
        let envelope: RpcEnvelope<UserRecord> =
            self.call("GetUser", &json!({ "username": username })).await?;

        match envelope.code {
            codes::OK => envelope.data.ok_or_else(|| DirectoryError::Backend {
                code: codes::OK,
                message: "OK response without record".to_string(),
            }),
            other => Err(Self::status_error(other, envelope.message)),
        }
    }

    async fn create_user(&self, record: NewUserRecord) -> Result<(), DirectoryError> {
        self.call("NewUser", &record).await.and_then(Self::ack)
    }

    async fn update_info(
        &self,
        username: &str,
        patch: UserInfoPatch,
    ) -> Result<(), DirectoryError> {
        self.call(
            "ModifyUserInfo",
            &json!({
                "username": username,
                "name": patch.name,
                "email": patch.email,
                "phone_number": patch.phone_number,
            }),
        )
        .await
        .and_then(Self::ack)
    }

    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), DirectoryError> {
        self.call(
            "ModifyUserPassword",
            &json!({ "username": username, "password_hash": password_hash }),
        )
        .await
        .and_then(Self::ack)
    }

    async fn update_role(&self, username: &str, role: Role) -> Result<(), DirectoryError> {
        self.call(
            "ModifyUserRole",
            &json!({ "username": username, "role": role }),
        )
        .await
        .and_then(Self::ack)
    }

    async fn delete_user(&self, username: &str) -> Result<(), DirectoryError> {
        self.call("DeleteUser", &json!({ "username": username }))
            .await
            .and_then(Self::ack)
    }
}
