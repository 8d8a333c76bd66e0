pub mod endpoints;

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, TaskdeskError, SERVER_UNAVAILABLE};

/// Requests that take longer than this fail like any other network error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client wrapper for the task management REST API.
#[derive(Debug, Clone)]
pub struct TaskdeskHttpClient {
    client: Client,
    base_url: String,
}

impl TaskdeskHttpClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// GET a JSON resource.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
        fallback: &str,
    ) -> Result<T> {
        let req = self.request(Method::GET, path, token).query(query);
        let resp = self.execute(req, token.is_some(), fallback).await?;
        resp.json::<T>().await.map_err(TaskdeskError::Request)
    }

    /// Send a JSON body with the given method and decode the JSON reply.
    pub async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &B,
        fallback: &str,
    ) -> Result<T> {
        let req = self.request(method, path, token).json(body);
        let resp = self.execute(req, token.is_some(), fallback).await?;
        resp.json::<T>().await.map_err(TaskdeskError::Request)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let req = self.client.request(method, url).timeout(REQUEST_TIMEOUT);
        match token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    /// Send `req`. A 401 on an authenticated request means the bearer token
    /// was rejected; on an anonymous one (login) it is an ordinary failure.
    async fn execute(
        &self,
        req: RequestBuilder,
        authenticated: bool,
        fallback: &str,
    ) -> Result<Response> {
        let resp = req.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                debug!(error = %e, "api unreachable");
                TaskdeskError::ServerUnavailable(SERVER_UNAVAILABLE.to_string())
            } else {
                TaskdeskError::Request(e)
            }
        })?;

        let status = resp.status();
        if authenticated && status == StatusCode::UNAUTHORIZED {
            return Err(TaskdeskError::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TaskdeskError::Http {
                status: status.as_u16(),
                message: error_message(&body, fallback),
            });
        }
        Ok(resp)
    }
}

/// Pick the human-readable message out of an error body: the JSON
/// `message` field, then `error`, else `fallback`.
pub fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"].iter().find_map(|k| {
                v.get(*k)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| fallback.to_string())
}

/// Decode an entity that the API may wrap in `data`, in one of `keys`, or
/// return bare.
pub fn unwrap_entity<T: DeserializeOwned>(mut value: Value, keys: &[&str]) -> Result<T> {
    if let Value::Object(map) = &mut value {
        for key in std::iter::once("data").chain(keys.iter().copied()) {
            match map.remove(key) {
                Some(Value::Null) | None => continue,
                Some(inner) => return serde_json::from_value(inner).map_err(Into::into),
            }
        }
    }
    serde_json::from_value(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_message_then_error() {
        assert_eq!(
            error_message(r#"{"message":"Email taken","error":"x"}"#, "fb"),
            "Email taken"
        );
        assert_eq!(error_message(r#"{"error":"Bad login"}"#, "fb"), "Bad login");
        assert_eq!(error_message("<html>502</html>", "Failed"), "Failed");
        assert_eq!(error_message("", "Failed"), "Failed");
    }

    #[test]
    fn test_request_carries_timeout_and_bearer() {
        let client = TaskdeskHttpClient::new("http://localhost:8000/");
        let req = client
            .request(Method::GET, "/api/users", Some("tok"))
            .build()
            .unwrap();
        assert_eq!(req.url().as_str(), "http://localhost:8000/api/users");
        assert_eq!(req.timeout(), Some(&REQUEST_TIMEOUT));
        assert_eq!(req.headers()["authorization"], "Bearer tok");

        let anon = client
            .request(Method::POST, "/api/auth/login", None)
            .build()
            .unwrap();
        assert!(anon.headers().get("authorization").is_none());
    }

    #[test]
    fn test_unwrap_entity_variants() {
        let wrapped = serde_json::json!({"data": {"n": 1}});
        let keyed = serde_json::json!({"task": {"n": 2}});
        let bare = serde_json::json!({"n": 3});

        #[derive(serde::Deserialize)]
        struct N {
            n: u32,
        }

        assert_eq!(unwrap_entity::<N>(wrapped, &["task"]).unwrap().n, 1);
        assert_eq!(unwrap_entity::<N>(keyed, &["task"]).unwrap().n, 2);
        assert_eq!(unwrap_entity::<N>(bare, &["task"]).unwrap().n, 3);
    }

    #[test]
    fn test_unwrap_entity_list_falls_through_null_data() {
        let v = serde_json::json!({"data": null, "members": [1, 2]});
        let list: Vec<u32> = unwrap_entity(v, &["members"]).unwrap();
        assert_eq!(list, vec![1, 2]);
    }
}
