//! REST client for the fabric zoning service

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};

use fczone_config::{unwrap_envelope, FabricSettings};
use fczone_core::{ApplyError, AuthError, ConfigError, ObjectKind, Result, ZoneError};

use crate::fabric::{Credentials, DeleteOutcome, FabricZoningService, SessionToken};

const YANG_JSON: &str = "application/yang-data+json";

const LOGIN_PATH: &str = "login";
const LOGOUT_PATH: &str = "logout";
const DEFINED_PATH: &str = "running/brocade-zone/defined-configuration";
const EFFECTIVE_PATH: &str = "running/brocade-zone/effective-configuration";
const COMMIT_PATH: &str = "running/brocade-zone/effective-configuration/cfg-action/1";

/// Path of an object below the defined configuration, with the name encoded
pub fn object_path(kind: ObjectKind, name: &str) -> String {
    format!(
        "{}/{}",
        DEFINED_PATH,
        kind.resource_key(&urlencoding::encode(name))
    )
}

/// Error text reported by the fabric, from `errors.error[0].error-message`
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/errors/error/0/error-message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no error message".to_string()
            } else {
                trimmed.to_string()
            }
        })
}

/// Delete status handling: 204 removed the object, 400 and 404 mean it was
/// not there
fn delete_outcome(status: StatusCode) -> Option<DeleteOutcome> {
    match status {
        StatusCode::NO_CONTENT => Some(DeleteOutcome::Deleted),
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => Some(DeleteOutcome::NotFound),
        _ => None,
    }
}

fn transport(operation: &str) -> impl FnOnce(reqwest::Error) -> ZoneError + '_ {
    move |e| {
        ApplyError::Transport {
            operation: operation.to_string(),
            message: e.to_string(),
        }
        .into()
    }
}

async fn status_error(operation: &str, response: Response) -> ZoneError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApplyError::Status {
        operation: operation.to_string(),
        status,
        message: error_message(&body),
    }
    .into()
}

/// reqwest-based [`FabricZoningService`]
pub struct HttpFabricClient {
    client: Client,
    base_url: String,
}

impl HttpFabricClient {
    pub fn new(settings: &FabricSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(YANG_JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(YANG_JSON));

        let client = Client::builder()
            .timeout(settings.timeout())
            .default_headers(headers)
            .danger_accept_invalid_certs(!settings.verify_tls)
            .build()
            .map_err(|e| ConfigError::Settings {
                message: format!("cannot create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, session: &SessionToken) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(AUTHORIZATION, session.as_str())
    }

    async fn fetch(&self, session: &SessionToken, path: &str, operation: &str) -> Result<Value> {
        log::debug!("GET {}", path);
        let response = self
            .request(Method::GET, path, session)
            .send()
            .await
            .map_err(transport(operation))?;

        if response.status() != StatusCode::OK {
            return Err(status_error(operation, response).await);
        }

        let document: Value = response.json().await.map_err(transport(operation))?;
        Ok(unwrap_envelope(document))
    }
}

#[async_trait]
impl FabricZoningService for HttpFabricClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken> {
        log::debug!("Logging in to {} as {}", self.base_url, credentials.username);

        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await
            .map_err(|e| AuthError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
            }
            .into());
        }

        let key = response
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingSessionKey)?;

        log::info!("Logged in to {}", self.base_url);
        Ok(SessionToken::new(key))
    }

    async fn fetch_defined_configuration(&self, session: &SessionToken) -> Result<Value> {
        self.fetch(session, DEFINED_PATH, "fetch defined configuration")
            .await
    }

    async fn fetch_effective_configuration(&self, session: &SessionToken) -> Result<Value> {
        self.fetch(session, EFFECTIVE_PATH, "fetch effective configuration")
            .await
    }

    async fn delete_object(
        &self,
        session: &SessionToken,
        kind: ObjectKind,
        name: &str,
    ) -> Result<DeleteOutcome> {
        let operation = format!("delete {} {}", kind, name);
        let path = object_path(kind, name);
        log::debug!("DELETE {}", path);

        let response = self
            .request(Method::DELETE, &path, session)
            .send()
            .await
            .map_err(transport(&operation))?;

        match delete_outcome(response.status()) {
            Some(outcome) => Ok(outcome),
            None => Err(status_error(&operation, response).await),
        }
    }

    async fn create_object(
        &self,
        session: &SessionToken,
        kind: ObjectKind,
        name: &str,
        payload: &Value,
    ) -> Result<()> {
        let operation = format!("create {} {}", kind, name);
        let path = object_path(kind, name);
        log::debug!("POST {}", path);

        let response = self
            .request(Method::POST, &path, session)
            .header(CONTENT_TYPE, YANG_JSON)
            .body(serde_json::to_vec(payload)?)
            .send()
            .await
            .map_err(transport(&operation))?;

        if response.status() != StatusCode::CREATED {
            return Err(status_error(&operation, response).await);
        }
        Ok(())
    }

    async fn commit(&self, session: &SessionToken, checksum: &str) -> Result<()> {
        let operation = "commit";
        log::debug!("PATCH {}", COMMIT_PATH);

        let response = self
            .request(Method::PATCH, COMMIT_PATH, session)
            .header(CONTENT_TYPE, YANG_JSON)
            .body(serde_json::to_vec(&json!({ "checksum": checksum }))?)
            .send()
            .await
            .map_err(transport(operation))?;

        if response.status().as_u16() >= 300 {
            return Err(status_error(operation, response).await);
        }
        Ok(())
    }

    async fn release(&self, session: &SessionToken) -> Result<()> {
        let operation = "logout";
        let response = self
            .request(Method::POST, LOGOUT_PATH, session)
            .send()
            .await
            .map_err(transport(operation))?;

        if response.status() != StatusCode::NO_CONTENT {
            return Err(status_error(operation, response).await);
        }
        log::info!("Logged out of {}", self.base_url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fczone_config::SettingsOverrides;
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    #[test]
    fn test_object_path() {
        assert_eq!(
            object_path(ObjectKind::Alias, "host1"),
            "running/brocade-zone/defined-configuration/alias/alias-name/host1"
        );
        assert_eq!(
            object_path(ObjectKind::Cfg, "prod cfg"),
            "running/brocade-zone/defined-configuration/cfg/cfg-name/prod%20cfg"
        );
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"errors": {"error": [{"error-message": "Zone does not exist"}]}}"#;
        assert_eq!(error_message(body), "Zone does not exist");
        assert_eq!(error_message("plain failure\n"), "plain failure");
        assert_eq!(error_message(""), "no error message");
    }

    #[test]
    fn test_delete_outcome() {
        assert_eq!(
            delete_outcome(StatusCode::NO_CONTENT),
            Some(DeleteOutcome::Deleted)
        );
        assert_eq!(
            delete_outcome(StatusCode::BAD_REQUEST),
            Some(DeleteOutcome::NotFound)
        );
        assert_eq!(
            delete_outcome(StatusCode::NOT_FOUND),
            Some(DeleteOutcome::NotFound)
        );
        assert_eq!(delete_outcome(StatusCode::INTERNAL_SERVER_ERROR), None);
    }

    #[test]
    fn test_client_base_url() {
        let overrides = SettingsOverrides {
            address: Some("10.0.0.5".to_string()),
            insecure: true,
            ..SettingsOverrides::default()
        };
        let settings = FabricSettings::load(None, &overrides).unwrap();
        let client = HttpFabricClient::new(&settings).unwrap();
        assert_eq!(client.url(LOGIN_PATH), "http://10.0.0.5/rest/login");
    }

    const SESSION_KEY: &str = "Custom_Basic c2Vzc2lvbg==";

    #[derive(Debug)]
    struct ReceivedRequest {
        request_line: String,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    }

    impl ReceivedRequest {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        }

        fn json(&self) -> Value {
            serde_json::from_slice(&self.body).unwrap()
        }
    }

    fn reply(status: &str, extra_headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            extra_headers,
            body.len(),
            body
        )
    }

    /// Loopback fabric answering one connection per canned reply, in order
    async fn fabric_server(
        replies: Vec<String>,
    ) -> (HttpFabricClient, JoinHandle<Vec<ReceivedRequest>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let server = tokio::spawn(async move {
            let mut received = Vec::new();
            for reply in replies {
                let (stream, _) = listener.accept().await.unwrap();
                let mut reader = BufReader::new(stream);

                let mut request_line = String::new();
                reader.read_line(&mut request_line).await.unwrap();

                let mut headers = Vec::new();
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).await.unwrap();
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    if let Some((key, value)) = line.split_once(':') {
                        headers.push((
                            key.trim().to_ascii_lowercase(),
                            value.trim().to_string(),
                        ));
                    }
                }

                let length = headers
                    .iter()
                    .find(|(key, _)| key == "content-length")
                    .and_then(|(_, value)| value.parse::<usize>().ok())
                    .unwrap_or(0);
                let mut body = vec![0; length];
                reader.read_exact(&mut body).await.unwrap();

                let mut stream = reader.into_inner();
                stream.write_all(reply.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();

                received.push(ReceivedRequest {
                    request_line: request_line.trim_end().to_string(),
                    headers,
                    body,
                });
            }
            received
        });

        let overrides = SettingsOverrides {
            address: Some(address),
            insecure: true,
            ..SettingsOverrides::default()
        };
        let settings = FabricSettings::load(None, &overrides).unwrap();
        (HttpFabricClient::new(&settings).unwrap(), server)
    }

    #[tokio::test]
    async fn test_requests_on_the_wire() {
        let replies = vec![
            reply(
                "200 OK",
                &format!("Authorization: {}\r\n", SESSION_KEY),
                "",
            ),
            reply("204 No Content", "", ""),
            reply("201 Created", "", ""),
            reply("204 No Content", "", ""),
            reply("204 No Content", "", ""),
        ];
        let (client, server) = fabric_server(replies).await;
        let payload = json!({"member-entry": {"alias-entry-name": ["10:00:00:00:00:00:00:01"]}});

        let session = client
            .authenticate(&Credentials::new("admin", "secret"))
            .await
            .unwrap();
        assert_eq!(session.as_str(), SESSION_KEY);

        let outcome = client
            .delete_object(&session, ObjectKind::Zone, "ZoneB")
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);

        client
            .create_object(&session, ObjectKind::Alias, "h1", &payload)
            .await
            .unwrap();
        client.commit(&session, "c0ffee").await.unwrap();
        client.release(&session).await.unwrap();

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 5);

        let login = &requests[0];
        assert_eq!(login.request_line, "POST /rest/login HTTP/1.1");
        assert_eq!(login.header("authorization"), Some("Basic YWRtaW46c2VjcmV0"));

        let delete = &requests[1];
        assert_eq!(
            delete.request_line,
            "DELETE /rest/running/brocade-zone/defined-configuration/zone/zone-name/ZoneB HTTP/1.1"
        );
        assert_eq!(delete.header("authorization"), Some(SESSION_KEY));

        let create = &requests[2];
        assert_eq!(
            create.request_line,
            "POST /rest/running/brocade-zone/defined-configuration/alias/alias-name/h1 HTTP/1.1"
        );
        assert_eq!(create.header("authorization"), Some(SESSION_KEY));
        assert_eq!(create.header("content-type"), Some(YANG_JSON));
        assert_eq!(create.json(), payload);

        let commit = &requests[3];
        assert_eq!(
            commit.request_line,
            "PATCH /rest/running/brocade-zone/effective-configuration/cfg-action/1 HTTP/1.1"
        );
        assert_eq!(commit.header("authorization"), Some(SESSION_KEY));
        assert_eq!(commit.header("content-type"), Some(YANG_JSON));
        assert_eq!(commit.json(), json!({"checksum": "c0ffee"}));

        let logout = &requests[4];
        assert_eq!(logout.request_line, "POST /rest/logout HTTP/1.1");
        assert_eq!(logout.header("authorization"), Some(SESSION_KEY));
    }

    #[tokio::test]
    async fn test_fetch_unwraps_envelope() {
        let body = r#"{"Response": {"effective-configuration": {"cfg-name": "prod", "checksum": "c1"}}}"#;
        let (client, server) = fabric_server(vec![reply("200 OK", "", body)]).await;

        let document = client
            .fetch_effective_configuration(&SessionToken::new(SESSION_KEY))
            .await
            .unwrap();
        assert_eq!(
            document,
            json!({"effective-configuration": {"cfg-name": "prod", "checksum": "c1"}})
        );

        let requests = server.await.unwrap();
        assert_eq!(
            requests[0].request_line,
            "GET /rest/running/brocade-zone/effective-configuration HTTP/1.1"
        );
        assert_eq!(requests[0].header("accept"), Some(YANG_JSON));
        assert_eq!(requests[0].header("authorization"), Some(SESSION_KEY));
    }

    #[tokio::test]
    async fn test_delete_server_error_carries_fabric_message() {
        let body = r#"{"errors": {"error": [{"error-message": "Transaction in progress"}]}}"#;
        let (client, server) =
            fabric_server(vec![reply("500 Internal Server Error", "", body)]).await;

        let err = client
            .delete_object(&SessionToken::new(SESSION_KEY), ObjectKind::Cfg, "prod")
            .await
            .unwrap_err();

        match err {
            ZoneError::Apply(ApplyError::Status {
                status, message, ..
            }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Transaction in progress");
            }
            other => panic!("unexpected error: {other}"),
        }
        server.await.unwrap();
    }
}
