//! Compliance API Client
//!
//! Read-only HTTP/JSON client for the collection server: the machine list,
//! per-machine reports and the export documents.

use crate::api::error::ApiError;
use crate::api::{ComplianceApi, ExportFormat, MachineQuery};
use crate::consts::cli_consts::http;
use crate::environment::Environment;
use crate::fleet::{MachineRecord, decode_list};
use reqwest::{Client, ClientBuilder, Response};
use serde_json::Value;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("posture-watch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ComplianceClient {
    client: Client,
    environment: Environment,
}

impl ComplianceClient {
    pub fn new(environment: Environment) -> Result<Self, ApiError> {
        Ok(Self {
            client: ClientBuilder::new()
                .connect_timeout(http::timeout())
                .timeout(http::timeout())
                .build()?,
            environment,
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.environment.api_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_bytes(&self, endpoint: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.build_url(endpoint);
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value, ApiError> {
        let bytes = self.get_bytes(endpoint).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait::async_trait]
impl ComplianceApi for ComplianceClient {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    async fn list_machines(&self, query: &MachineQuery) -> Result<Vec<MachineRecord>, ApiError> {
        let endpoint = format!("machines{}", query.to_query_string());
        let body = self.get_json(&endpoint).await?;
        Ok(decode_list(body)?)
    }

    async fn get_machine(&self, machine_id: &str) -> Result<MachineRecord, ApiError> {
        let endpoint = format!("machine/{}", urlencoding::encode(machine_id));
        let body = self.get_json(&endpoint).await?;
        Ok(MachineRecord::from_value(body)?)
    }

    fn export_url(&self, format: ExportFormat) -> String {
        self.build_url(&format!("export/{}", format.as_str()))
    }

    async fn download_export(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(&format!("export/{}", format.as_str())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::IssueKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Serve the same canned response to every connection and report each
    /// request line.
    async fn serve(status: &'static str, body: &'static str) -> (String, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let tx = tx.clone();
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    let text = String::from_utf8_lossy(&request);
                    let _ = tx.send(text.lines().next().unwrap_or_default().to_string());

                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        (format!("http://{}", addr), rx)
    }

    fn client_for(base: &str) -> ComplianceClient {
        ComplianceClient::new(Environment::Custom(base.to_string())).unwrap()
    }

    #[tokio::test]
    async fn lists_machines_with_server_filters() {
        let (base, mut requests) = serve(
            "200 OK",
            r#"[{"machine_id":"m1","os":"Linux"},{"machine_id":"m2","os":"Linux"}]"#,
        )
        .await;
        let client = client_for(&base);

        let query = MachineQuery {
            os: Some("Linux".to_string()),
            issue: Some(IssueKind::OutdatedOs),
        };
        let machines = client.list_machines(&query).await.unwrap();
        assert_eq!(machines.len(), 2);
        assert_eq!(machines[1].machine_id, "m2");
        assert_eq!(
            requests.recv().await.unwrap(),
            "GET /machines?os=Linux&issue=outdated_os HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn null_collection_is_empty() {
        let (base, _requests) = serve("200 OK", "null").await;
        let machines = client_for(&base)
            .list_machines(&MachineQuery::default())
            .await
            .unwrap();
        assert!(machines.is_empty());
    }

    #[tokio::test]
    async fn machine_id_is_path_encoded() {
        let (base, mut requests) = serve("200 OK", r#"{"machine_id":"lab 1/a"}"#).await;
        let machine = client_for(&base).get_machine("lab 1/a").await.unwrap();
        assert_eq!(machine.machine_id, "lab 1/a");
        assert_eq!(
            requests.recv().await.unwrap(),
            "GET /machine/lab%201%2Fa HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (base, _requests) = serve("404 Not Found", r#"{"detail":"Machine not found"}"#).await;
        let err = client_for(&base).get_machine("missing").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let (base, _requests) = serve("200 OK", "<html>").await;
        let err = client_for(&base)
            .list_machines(&MachineQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn downloads_export_bytes() {
        let (base, mut requests) = serve("200 OK", "machine_id,os\nm1,Linux\n").await;
        let client = client_for(&base);
        let bytes = client.download_export(ExportFormat::Csv).await.unwrap();
        assert_eq!(bytes, b"machine_id,os\nm1,Linux\n");
        assert_eq!(requests.recv().await.unwrap(), "GET /export/csv HTTP/1.1");
        assert_eq!(client.export_url(ExportFormat::Json), format!("{}/export/json", base));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let err = client_for(&base)
            .list_machines(&MachineQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Reqwest(_)));
    }
}
