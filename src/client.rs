//! REST client for the Artifactory management API.
//!
//! A stateless one-call-per-endpoint wrapper: credentials are supplied once
//! at construction, every call is a blocking round-trip, and payloads are
//! forwarded without local validation. Non-2xx responses surface as
//! [`Error::RemoteCall`] with the raw status; the caller decides what a
//! failure means.

use crate::config::Payload;
use crate::error::Result;
use crate::resolve::ConnectionContext;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;

/// Per-endpoint operations exposed by the remote management API.
///
/// The reconciliation engine only talks to this trait, so tests substitute
/// an in-memory implementation.
pub trait ArtifactoryApi {
    fn system_information(&self) -> Result<String>;
    fn system_health(&self) -> Result<String>;
    fn system_configuration(&self) -> Result<String>;

    fn license_information(&self) -> Result<Value>;
    fn license_install(&self, payload: &Payload) -> Result<Value>;

    fn repository_list(&self, repo_type: Option<&str>) -> Result<Value>;
    fn repository_detail(&self, key: &str) -> Result<Value>;
    fn repository_create(&self, key: &str, payload: &Payload) -> Result<u16>;
    fn repository_update(&self, key: &str, payload: &Payload) -> Result<u16>;
    fn repository_delete(&self, key: &str) -> Result<u16>;

    fn user_list(&self) -> Result<Value>;
    fn user_detail(&self, name: &str) -> Result<Value>;
    fn user_create(&self, name: &str, payload: &Payload) -> Result<u16>;
    fn user_update(&self, name: &str, payload: &Payload) -> Result<u16>;
    fn user_delete(&self, name: &str) -> Result<u16>;

    fn group_list(&self) -> Result<Value>;
    fn group_detail(&self, name: &str) -> Result<Value>;
    fn group_create(&self, name: &str, payload: &Payload) -> Result<u16>;
    fn group_update(&self, name: &str, payload: &Payload) -> Result<u16>;
    fn group_delete(&self, name: &str) -> Result<u16>;

    fn permission_list(&self) -> Result<Value>;
    fn permission_detail(&self, name: &str) -> Result<Value>;
    fn permission_create(&self, name: &str, payload: &Payload) -> Result<u16>;
    fn permission_update(&self, name: &str, payload: &Payload) -> Result<u16>;
    fn permission_delete(&self, name: &str) -> Result<u16>;
}

/// HTTP verb used for payload-carrying calls.
#[derive(Debug, Clone, Copy)]
enum Verb {
    Put,
    Post,
}

/// HTTP client for one Artifactory instance.
pub struct ArtifactoryClient {
    agent: ureq::Agent,
    /// Management URI, `<base>/api/`.
    mgmt_uri: String,
    /// Precomputed `Authorization: Basic` header value.
    auth: String,
}

impl ArtifactoryClient {
    /// Create a client from a resolved connection context.
    #[must_use]
    pub fn new(ctx: &ConnectionContext) -> Self {
        Self::with_credentials(&ctx.base_url, &ctx.username, &ctx.password)
    }

    /// Create a client from raw connection values.
    #[must_use]
    pub fn with_credentials(base_url: &str, username: &str, password: &str) -> Self {
        let credentials = BASE64.encode(format!("{username}:{password}"));
        Self {
            agent: ureq::Agent::new_with_defaults(),
            mgmt_uri: format!("{}/api/", base_url.trim_end_matches('/')),
            auth: format!("Basic {credentials}"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.mgmt_uri)
    }

    fn get_text(&self, path: &str) -> Result<String> {
        let mut response = self
            .agent
            .get(self.url(path))
            .header("Authorization", &self.auth)
            .call()?;
        Ok(response.body_mut().read_to_string()?)
    }

    fn get_json(&self, path: &str, query: Option<(&str, &str)>) -> Result<Value> {
        let mut request = self
            .agent
            .get(self.url(path))
            .header("Authorization", &self.auth);
        if let Some((key, value)) = query {
            request = request.query(key, value);
        }
        let mut response = request.call()?;
        Ok(response.body_mut().read_json()?)
    }

    /// Send a payload and return the response status code.
    fn send_payload(
        &self,
        verb: Verb,
        path: &str,
        query: Option<(&str, &str)>,
        payload: &Payload,
    ) -> Result<u16> {
        let url = self.url(path);
        let mut request = match verb {
            Verb::Put => self.agent.put(url),
            Verb::Post => self.agent.post(url),
        }
        .header("Authorization", &self.auth);
        if let Some((key, value)) = query {
            request = request.query(key, value);
        }
        let response = match payload {
            Payload::Structured(value) => request.send_json(value)?,
            Payload::Raw(text) => request
                .header("Content-Type", "application/json")
                .send(text.as_str())?,
        };
        Ok(response.status().as_u16())
    }

    fn delete(&self, path: &str) -> Result<u16> {
        let response = self
            .agent
            .delete(self.url(path))
            .header("Authorization", &self.auth)
            .call()?;
        Ok(response.status().as_u16())
    }
}

impl ArtifactoryApi for ArtifactoryClient {
    fn system_information(&self) -> Result<String> {
        self.get_text("system")
    }

    fn system_health(&self) -> Result<String> {
        self.get_text("system/ping")
    }

    fn system_configuration(&self) -> Result<String> {
        self.get_text("system/configuration")
    }

    fn license_information(&self) -> Result<Value> {
        self.get_json("system/license", None)
    }

    fn license_install(&self, payload: &Payload) -> Result<Value> {
        let mut request = self
            .agent
            .put(self.url("system/license"))
            .header("Authorization", &self.auth);
        request = request.header("Content-Type", "application/json");
        let mut response = match payload {
            Payload::Structured(value) => request.send_json(value)?,
            Payload::Raw(text) => request.send(text.as_str())?,
        };
        Ok(response.body_mut().read_json()?)
    }

    fn repository_list(&self, repo_type: Option<&str>) -> Result<Value> {
        self.get_json("repositories", repo_type.map(|t| ("type", t)))
    }

    fn repository_detail(&self, key: &str) -> Result<Value> {
        self.get_json(&format!("repositories/{key}"), None)
    }

    fn repository_create(&self, key: &str, payload: &Payload) -> Result<u16> {
        self.send_payload(Verb::Put, &format!("repositories/{key}"), None, payload)
    }

    fn repository_update(&self, key: &str, payload: &Payload) -> Result<u16> {
        self.send_payload(Verb::Post, &format!("repositories/{key}"), None, payload)
    }

    fn repository_delete(&self, key: &str) -> Result<u16> {
        self.delete(&format!("repositories/{key}"))
    }

    fn user_list(&self) -> Result<Value> {
        self.get_json("security/users", None)
    }

    fn user_detail(&self, name: &str) -> Result<Value> {
        self.get_json(&format!("security/users/{name}"), None)
    }

    fn user_create(&self, name: &str, payload: &Payload) -> Result<u16> {
        self.send_payload(
            Verb::Put,
            &format!("security/users/{name}"),
            Some(("username", name)),
            payload,
        )
    }

    fn user_update(&self, name: &str, payload: &Payload) -> Result<u16> {
        self.send_payload(
            Verb::Post,
            &format!("security/users/{name}"),
            Some(("username", name)),
            payload,
        )
    }

    fn user_delete(&self, name: &str) -> Result<u16> {
        self.delete(&format!("security/users/{name}"))
    }

    fn group_list(&self) -> Result<Value> {
        self.get_json("security/groups", None)
    }

    fn group_detail(&self, name: &str) -> Result<Value> {
        self.get_json(&format!("security/groups/{name}"), None)
    }

    fn group_create(&self, name: &str, payload: &Payload) -> Result<u16> {
        self.send_payload(
            Verb::Put,
            &format!("security/groups/{name}"),
            Some(("groupname", name)),
            payload,
        )
    }

    fn group_update(&self, name: &str, payload: &Payload) -> Result<u16> {
        self.send_payload(
            Verb::Post,
            &format!("security/groups/{name}"),
            Some(("groupname", name)),
            payload,
        )
    }

    fn group_delete(&self, name: &str) -> Result<u16> {
        self.delete(&format!("security/groups/{name}"))
    }

    fn permission_list(&self) -> Result<Value> {
        self.get_json("security/permissions", None)
    }

    fn permission_detail(&self, name: &str) -> Result<Value> {
        self.get_json(&format!("security/permissions/{name}"), None)
    }

    fn permission_create(&self, name: &str, payload: &Payload) -> Result<u16> {
        self.send_payload(
            Verb::Put,
            &format!("security/permissions/{name}"),
            Some(("permissionname", name)),
            payload,
        )
    }

    // Permission targets are replaced whole; the API takes a PUT for both
    // create and update.
    fn permission_update(&self, name: &str, payload: &Payload) -> Result<u16> {
        self.send_payload(
            Verb::Put,
            &format!("security/permissions/{name}"),
            Some(("permissionname", name)),
            payload,
        )
    }

    fn permission_delete(&self, name: &str) -> Result<u16> {
        self.delete(&format!("security/permissions/{name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mgmt_uri_is_base_plus_api() {
        let client = ArtifactoryClient::with_credentials(
            "http://art.example.com/artifactory",
            "admin",
            "secret",
        );
        assert_eq!(
            client.url("system/ping"),
            "http://art.example.com/artifactory/api/system/ping"
        );
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let client =
            ArtifactoryClient::with_credentials("http://art.example.com/artifactory/", "a", "b");
        assert_eq!(
            client.url("repositories"),
            "http://art.example.com/artifactory/api/repositories"
        );
    }

    #[test]
    fn auth_header_is_basic() {
        let client = ArtifactoryClient::with_credentials("http://h/artifactory", "admin", "pw");
        // "admin:pw" base64-encoded
        assert_eq!(client.auth, "Basic YWRtaW46cHc=");
    }
}
