use crate::error::{RegistryError, Result};
use crate::{RegisteredSchema, SchemaId, SchemaRegistry};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const CONTENT_TYPE: &str = "application/vnd.schemaregistry.v1+json";
const ACCEPT: &str = "application/vnd.schemaregistry.v1+json, application/json";

/// Connection settings for [`HttpRegistry`].
#[derive(Debug, Clone)]
pub struct HttpRegistryConfig {
    /// Base URL of the Confluent-compatible API, e.g.
    /// `http://registry:8080/apis/ccompat/v6`
    pub base_url: String,
    /// `user` and optional `password` for HTTP basic auth
    pub basic_auth: Option<(String, Option<String>)>,
    pub timeout: Duration,
}

impl HttpRegistryConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            basic_auth: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Parse `user:password` user info, as carried by `basic.auth.user.info`.
    pub fn with_user_info(mut self, user_info: &str) -> Self {
        let (user, password) = match user_info.split_once(':') {
            Some((user, password)) => (user.to_string(), Some(password.to_string())),
            None => (user_info.to_string(), None),
        };
        self.basic_auth = Some((user, password));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for a Confluent-compatible schema registry REST API.
pub struct HttpRegistry {
    client: Client,
    base_url: Url,
    basic_auth: Option<(String, Option<String>)>,
}

#[derive(Serialize)]
struct SchemaRequest<'a> {
    schema: &'a str,
}

#[derive(Deserialize)]
struct IdResponse {
    id: SchemaId,
}

#[derive(Deserialize)]
struct SubjectVersionResponse {
    subject: String,
    id: SchemaId,
    version: i32,
    schema: String,
}

#[derive(Deserialize)]
struct SchemaResponse {
    schema: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error_code: i32,
    message: String,
}

impl HttpRegistry {
    pub fn new(config: HttpRegistryConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| RegistryError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(RegistryError::InvalidUrl {
                url: config.base_url,
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url,
            basic_auth: config.basic_auth,
        })
    }

    /// Base URL extended with percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn with_normalize(mut url: Url, normalize: bool) -> Url {
        if normalize {
            url.query_pairs_mut().append_pair("normalize", "true");
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.basic_auth {
            Some((user, password)) => request.basic_auth(user, password.as_deref()),
            None => request,
        }
    }

    async fn post_schema(&self, url: Url, schema: &str) -> Result<Response> {
        debug!(url = %url, "POST schema");
        let request = self
            .client
            .post(url)
            .header("Content-Type", CONTENT_TYPE)
            .header("Accept", ACCEPT)
            .json(&SchemaRequest { schema });
        let response = self.authorize(request).send().await?;
        Self::check(response).await
    }

    async fn get(&self, url: Url) -> Result<Response> {
        debug!(url = %url, "GET");
        let request = self.client.get(url).header("Accept", ACCEPT);
        let response = self.authorize(request).send().await?;
        Self::check(response).await
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(parse_error(status.as_u16(), &body))
    }
}

/// Map a registry error body to a [`RegistryError`].
fn parse_error(status: u16, body: &str) -> RegistryError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => match err.error_code {
            40401 => RegistryError::SubjectNotFound(err.message),
            40402 => RegistryError::VersionNotFound(err.message),
            40403 => RegistryError::SchemaNotFound(err.message),
            42201 => RegistryError::InvalidSchema(err.message),
            409 | 40901 => RegistryError::IncompatibleSchema(err.message),
            _ => RegistryError::Http {
                status,
                message: err.message,
            },
        },
        Err(_) => RegistryError::Http {
            status,
            message: body.to_string(),
        },
    }
}

#[async_trait]
impl SchemaRegistry for HttpRegistry {
    async fn register(&self, subject: &str, schema: &str, normalize: bool) -> Result<SchemaId> {
        let url = Self::with_normalize(self.endpoint(&["subjects", subject, "versions"]), normalize);
        let response: IdResponse = self.post_schema(url, schema).await?.json().await?;
        debug!(subject, id = response.id, "Registered schema");
        Ok(response.id)
    }

    async fn get_id(&self, subject: &str, schema: &str, normalize: bool) -> Result<SchemaId> {
        let url = Self::with_normalize(self.endpoint(&["subjects", subject]), normalize);
        let response: SubjectVersionResponse = self.post_schema(url, schema).await?.json().await?;
        Ok(response.id)
    }

    async fn lookup_latest_version(&self, subject: &str) -> Result<RegisteredSchema> {
        let url = self.endpoint(&["subjects", subject, "versions", "latest"]);
        let response: SubjectVersionResponse = self.get(url).await?.json().await?;
        Ok(RegisteredSchema {
            subject: response.subject,
            id: response.id,
            version: response.version,
            schema: response.schema,
        })
    }

    async fn lookup_by_id(&self, id: SchemaId) -> Result<String> {
        let id = id.to_string();
        let url = self.endpoint(&["schemas", "ids", &id]);
        let response: SchemaResponse = self.get(url).await?.json().await?;
        Ok(response.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(base_url: &str) -> HttpRegistry {
        HttpRegistry::new(HttpRegistryConfig::new(base_url)).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let registry = registry("http://registry:8080/apis/ccompat/v6");
        assert_eq!(
            registry
                .endpoint(&["subjects", "orders-com.example.Order", "versions"])
                .as_str(),
            "http://registry:8080/apis/ccompat/v6/subjects/orders-com.example.Order/versions"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash_base() {
        let registry = registry("http://registry:8080/");
        assert_eq!(
            registry.endpoint(&["schemas", "ids", "7"]).as_str(),
            "http://registry:8080/schemas/ids/7"
        );
    }

    #[test]
    fn test_endpoint_encodes_subject() {
        let registry = registry("http://registry:8080");
        let url = registry.endpoint(&["subjects", "a/b c", "versions", "latest"]);
        assert_eq!(
            url.as_str(),
            "http://registry:8080/subjects/a%2Fb%20c/versions/latest"
        );
    }

    #[test]
    fn test_normalize_query() {
        let registry = registry("http://registry:8080");
        let url = HttpRegistry::with_normalize(registry.endpoint(&["subjects", "s"]), true);
        assert_eq!(url.as_str(), "http://registry:8080/subjects/s?normalize=true");
        let url = HttpRegistry::with_normalize(registry.endpoint(&["subjects", "s"]), false);
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpRegistry::new(HttpRegistryConfig::new("not a url")),
            Err(RegistryError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpRegistry::new(HttpRegistryConfig::new("mailto:registry@example.com")),
            Err(RegistryError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_user_info() {
        let config = HttpRegistryConfig::new("http://r").with_user_info("alice:s3cr:et");
        assert_eq!(
            config.basic_auth,
            Some(("alice".to_string(), Some("s3cr:et".to_string())))
        );

        let config = HttpRegistryConfig::new("http://r").with_user_info("bob");
        assert_eq!(config.basic_auth, Some(("bob".to_string(), None)));
    }

    #[test]
    fn test_parse_error_codes() {
        let body = |code: i32| format!(r#"{{"error_code":{code},"message":"m"}}"#);

        assert!(matches!(
            parse_error(404, &body(40401)),
            RegistryError::SubjectNotFound(_)
        ));
        assert!(matches!(
            parse_error(404, &body(40402)),
            RegistryError::VersionNotFound(_)
        ));
        assert!(matches!(
            parse_error(404, &body(40403)),
            RegistryError::SchemaNotFound(_)
        ));
        assert!(matches!(
            parse_error(409, &body(409)),
            RegistryError::IncompatibleSchema(_)
        ));
        assert!(matches!(
            parse_error(422, &body(42201)),
            RegistryError::InvalidSchema(_)
        ));
        assert!(matches!(
            parse_error(500, &body(50001)),
            RegistryError::Http { status: 500, .. }
        ));
    }

    #[test]
    fn test_parse_error_non_json_body() {
        match parse_error(502, "Bad Gateway") {
            RegistryError::Http { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// A request as the canned server received it.
    #[derive(Debug)]
    struct Captured {
        method: String,
        target: String,
        headers: Vec<(String, String)>,
        body: String,
    }

    impl Captured {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        }

        fn json(&self) -> serde_json::Value {
            serde_json::from_str(&self.body).unwrap()
        }
    }

    async fn read_request(stream: &mut tokio::net::TcpStream) -> Captured {
        use tokio::io::AsyncReadExt;

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the request headers ended");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
        let mut lines = head.split("\r\n");
        let mut request_line = lines.next().unwrap().split(' ');
        let method = request_line.next().unwrap().to_string();
        let target = request_line.next().unwrap().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(key, value)| (key.trim().to_ascii_lowercase(), value.trim().to_string()))
            .collect();

        let content_length = headers
            .iter()
            .find(|(key, _)| key == "content-length")
            .map(|(_, value)| value.parse::<usize>().unwrap())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the request body ended");
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = String::from_utf8(buf[header_end..header_end + content_length].to_vec()).unwrap();

        Captured {
            method,
            target,
            headers,
            body,
        }
    }

    /// Answer one connection per canned response, in order, and hand back
    /// what was received.
    async fn serve(
        responses: Vec<(u16, serde_json::Value)>,
    ) -> (String, tokio::task::JoinHandle<Vec<Captured>>) {
        use tokio::io::AsyncWriteExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/apis/ccompat/v6", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut captured = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                captured.push(read_request(&mut stream).await);

                let body = body.to_string();
                let response = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: {CONTENT_TYPE}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
            captured
        });
        (base_url, handle)
    }

    const USER: &str = r#"{"type":"record","name":"User","fields":[]}"#;

    #[tokio::test]
    async fn test_requests_against_registry() {
        let (base_url, server) = serve(vec![
            (200, serde_json::json!({"id": 7})),
            (
                200,
                serde_json::json!({"subject": "orders-value", "id": 7, "version": 1, "schema": USER}),
            ),
            (
                200,
                serde_json::json!({"subject": "orders-value", "id": 9, "version": 2, "schema": USER}),
            ),
            (200, serde_json::json!({"schema": USER})),
        ])
        .await;
        let registry =
            HttpRegistry::new(HttpRegistryConfig::new(base_url).with_user_info("u:p")).unwrap();

        assert_eq!(registry.register("orders-value", USER, true).await.unwrap(), 7);
        assert_eq!(registry.get_id("orders-value", USER, false).await.unwrap(), 7);
        assert_eq!(
            registry.lookup_latest_version("orders-value").await.unwrap(),
            RegisteredSchema {
                subject: "orders-value".to_string(),
                id: 9,
                version: 2,
                schema: USER.to_string(),
            }
        );
        assert_eq!(registry.lookup_by_id(7).await.unwrap(), USER);

        let requests = server.await.unwrap();
        let expected = [
            ("POST", "/apis/ccompat/v6/subjects/orders-value/versions?normalize=true"),
            ("POST", "/apis/ccompat/v6/subjects/orders-value"),
            ("GET", "/apis/ccompat/v6/subjects/orders-value/versions/latest"),
            ("GET", "/apis/ccompat/v6/schemas/ids/7"),
        ];
        assert_eq!(requests.len(), expected.len());
        for (request, (method, target)) in requests.iter().zip(expected) {
            assert_eq!(request.method, method);
            assert_eq!(request.target, target);
            // base64("u:p")
            assert_eq!(request.header("authorization"), Some("Basic dTpw"));
        }

        for request in &requests[..2] {
            assert_eq!(request.header("content-type"), Some(CONTENT_TYPE));
            assert_eq!(request.json(), serde_json::json!({ "schema": USER }));
        }
        assert!(requests[2].body.is_empty());
        assert!(requests[3].body.is_empty());
    }

    #[tokio::test]
    async fn test_error_bodies_become_typed_errors() {
        let (base_url, server) = serve(vec![
            (
                404,
                serde_json::json!({"error_code": 40403, "message": "Schema not found"}),
            ),
            (
                404,
                serde_json::json!({"error_code": 40401, "message": "Subject 'nope' not found."}),
            ),
            (
                409,
                serde_json::json!({"error_code": 409, "message": "incompatible"}),
            ),
            (
                500,
                serde_json::json!({"error_code": 50001, "message": "store error"}),
            ),
        ])
        .await;
        let registry = HttpRegistry::new(HttpRegistryConfig::new(base_url)).unwrap();

        assert!(matches!(
            registry.lookup_by_id(42).await,
            Err(RegistryError::SchemaNotFound(message)) if message == "Schema not found"
        ));
        assert!(matches!(
            registry.lookup_latest_version("nope").await,
            Err(RegistryError::SubjectNotFound(_))
        ));
        assert!(matches!(
            registry.register("orders-value", USER, false).await,
            Err(RegistryError::IncompatibleSchema(_))
        ));
        assert!(matches!(
            registry.get_id("orders-value", USER, false).await,
            Err(RegistryError::Http { status: 500, .. })
        ));

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].header("authorization"), None);
    }
}
