//! Sheets API values client

use super::credentials::{Credentials, ServiceAccount};
use crate::error::{Result, SheetError};
use crate::source::ValueSource;
use crate::types::{Grid, SheetRange};
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::future::Future;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

/// Sheets API v4 base URL
pub const DEFAULT_ENDPOINT: &str = "https://sheets.googleapis.com/v4";

/// Raw cell values: numbers stay numbers, dates stay serials
const VALUE_RENDER_OPTION: &str = "UNFORMATTED_VALUE";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Tokens are refreshed this long before Google expires them
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Grid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetResponse {
    #[serde(default)]
    value_ranges: Vec<ValueRange>,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

struct CachedToken {
    token: String,
    refresh_at: DateTime<Utc>,
}

/// When a token issued at `now` for `expires_in` seconds should be replaced
fn refresh_deadline(now: DateTime<Utc>, expires_in: i64) -> Result<DateTime<Utc>> {
    Duration::try_seconds(expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS))
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            SheetError::Credentials(format!(
                "token endpoint returned unusable expires_in {}",
                expires_in
            ))
        })
}

/// Google Sheets values reader for one spreadsheet
///
/// Cell values are requested unformatted, so dates arrive as serial numbers
/// ready for [`SerialDate`](crate::serial_date::SerialDate).
///
/// # Example
///
/// ```no_run
/// use gsheets::records::shape_records;
/// use gsheets::sheets::SheetService;
/// use gsheets::source::ValueSource;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let service = SheetService::from_env("1f5epAPxP_Yd3g1TunEMdtianpVAhKS0RG6BKRDSLtrk")?;
///
///     let range = service.sheet_range("Orders", "A1:F500");
///     let records = shape_records(&service.get(&range).await?)?;
///     println!("{} orders", records.len());
///     Ok(())
/// }
/// ```
pub struct SheetService {
    http: reqwest::Client,
    endpoint: Url,
    spreadsheet_id: String,
    credentials: Credentials,
    token: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for SheetService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetService")
            .field("endpoint", &self.endpoint.as_str())
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field(
                "auth",
                &match self.credentials {
                    Credentials::ServiceAccount(_) => "service_account",
                    Credentials::AccessToken(_) => "access_token",
                },
            )
            .finish()
    }
}

impl SheetService {
    /// Create a new service builder
    pub fn builder() -> SheetServiceBuilder {
        SheetServiceBuilder::default()
    }

    /// Service for `spreadsheet_id` with credentials taken from the environment
    ///
    /// See [`Credentials::from_env`] for the lookup order.
    pub fn from_env(spreadsheet_id: impl Into<String>) -> Result<Self> {
        Self::builder()
            .spreadsheet_id(spreadsheet_id)
            .credentials(Credentials::from_env()?)
            .build()
    }

    /// Spreadsheet this service reads from
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Format a sheet-qualified range string, e.g. `Orders!A1:F500`
    pub fn sheet_range(&self, sheet: &str, range: &str) -> String {
        SheetRange::new(sheet, range).to_string()
    }

    fn spreadsheet_url(&self, tail: &[&str]) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| SheetError::Config(format!("endpoint {} cannot be a base", self.endpoint)))?
            .pop_if_empty()
            .push("spreadsheets")
            .push(&self.spreadsheet_id)
            .extend(tail);
        Ok(url)
    }

    fn values_url(&self, range: &str) -> Result<Url> {
        let mut url = self.spreadsheet_url(&["values", range])?;
        url.query_pairs_mut()
            .append_pair("valueRenderOption", VALUE_RENDER_OPTION);
        Ok(url)
    }

    fn batch_get_url(&self, ranges: &[String]) -> Result<Url> {
        let mut url = self.spreadsheet_url(&["values:batchGet"])?;
        {
            let mut query = url.query_pairs_mut();
            for range in ranges {
                query.append_pair("ranges", range);
            }
            query.append_pair("valueRenderOption", VALUE_RENDER_OPTION);
        }
        Ok(url)
    }

    async fn access_token(&self) -> Result<String> {
        let account = match &self.credentials {
            Credentials::AccessToken(token) => return Ok(token.clone()),
            Credentials::ServiceAccount(account) => account,
        };

        let mut cached = self.token.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref() {
            if token.refresh_at > now {
                return Ok(token.token.clone());
            }
        }

        let fresh = self.exchange_assertion(account, now).await?;
        let refresh_at = refresh_deadline(now, fresh.expires_in)?;
        info!(
            client_email = %account.client_email,
            expires_in = fresh.expires_in,
            "refreshed access token"
        );
        let token = fresh.access_token.clone();
        *cached = Some(CachedToken {
            token: fresh.access_token,
            refresh_at,
        });
        Ok(token)
    }

    async fn exchange_assertion(
        &self,
        account: &ServiceAccount,
        now: DateTime<Utc>,
    ) -> Result<AccessTokenResponse> {
        let assertion = account.assertion(now)?;
        let response = self
            .http
            .post(&account.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let token = self.access_token().await?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        Ok(check_status(response).await?.json().await?)
    }
}

/// Turn a non-success response into [`SheetError::Api`]
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = parse_error_message(&body);
    warn!(status = status.as_u16(), message = %message, "sheets request failed");
    Err(SheetError::Api {
        status: status.as_u16(),
        message,
    })
}

fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

impl ValueSource for SheetService {
    fn get(&self, range: &str) -> impl Future<Output = Result<Grid>> + Send {
        async move {
            let url = self.values_url(range)?;
            debug!(spreadsheet_id = %self.spreadsheet_id, range, "values.get");
            let value_range: ValueRange = self.fetch_json(url).await?;
            Ok(value_range.values)
        }
    }

    fn batch_get(&self, ranges: &[String]) -> impl Future<Output = Result<Vec<Grid>>> + Send {
        async move {
            let url = self.batch_get_url(ranges)?;
            debug!(spreadsheet_id = %self.spreadsheet_id, ranges = ranges.len(), "values.batchGet");
            let response: BatchGetResponse = self.fetch_json(url).await?;
            Ok(response
                .value_ranges
                .into_iter()
                .map(|value_range| value_range.values)
                .collect())
        }
    }
}

/// Builder for [`SheetService`]
#[derive(Default)]
pub struct SheetServiceBuilder {
    spreadsheet_id: Option<String>,
    credentials: Option<Credentials>,
    endpoint: Option<String>,
    http: Option<reqwest::Client>,
}

impl SheetServiceBuilder {
    /// Set the spreadsheet key (the id in the spreadsheet URL)
    pub fn spreadsheet_id(mut self, spreadsheet_id: impl Into<String>) -> Self {
        self.spreadsheet_id = Some(spreadsheet_id.into());
        self
    }

    /// Set how requests are authorized
    pub fn credentials(mut self, credentials: impl Into<Credentials>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    /// Override the API base URL (default: [`DEFAULT_ENDPOINT`])
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Use a preconfigured HTTP client
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Build the service
    pub fn build(self) -> Result<SheetService> {
        let spreadsheet_id = self
            .spreadsheet_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SheetError::Config("spreadsheet id is required".to_string()))?;
        let credentials = self
            .credentials
            .ok_or_else(|| SheetError::Config("credentials are required".to_string()))?;

        let endpoint = self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SheetError::Config(format!("invalid endpoint {}: {}", endpoint, e)))?;
        if endpoint.cannot_be_a_base() {
            return Err(SheetError::Config(format!(
                "endpoint {} cannot be a base",
                endpoint
            )));
        }

        info!(spreadsheet_id = %spreadsheet_id, endpoint = %endpoint, "sheet service ready");

        Ok(SheetService {
            http: self.http.unwrap_or_default(),
            endpoint,
            spreadsheet_id,
            credentials,
            token: Mutex::new(None),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;
    use std::sync::{Arc, Mutex as StdMutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const KEY_JSON: &str = include_str!("../../tests/data/service_account.json");

    /// One request as seen by [`LocalApi`]
    #[derive(Debug, Clone)]
    struct Recorded {
        method: String,
        target: String,
        headers: Vec<(String, String)>,
        body: String,
    }

    impl Recorded {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        }
    }

    /// HTTP/1.1 server on a loopback port answering from a fixed routing function
    struct LocalApi {
        base: String,
        requests: Arc<StdMutex<Vec<Recorded>>>,
    }

    impl LocalApi {
        async fn start<F>(respond: F) -> Self
        where
            F: Fn(&Recorded) -> (u16, String) + Send + Sync + 'static,
        {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base = format!("http://{}", listener.local_addr().unwrap());
            let requests = Arc::new(StdMutex::new(Vec::new()));
            let log = requests.clone();

            tokio::spawn(async move {
                while let Ok((mut stream, _)) = listener.accept().await {
                    let request = read_request(&mut stream).await;
                    let (status, body) = respond(&request);
                    log.lock().unwrap().push(request);

                    let response = format!(
                        "HTTP/1.1 {} Fixture\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    stream.write_all(response.as_bytes()).await.unwrap();
                    let _ = stream.shutdown().await;
                }
            });

            LocalApi { base, requests }
        }

        fn endpoint(&self) -> String {
            format!("{}/v4", self.base)
        }

        fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }
    }

    async fn read_request(stream: &mut TcpStream) -> Recorded {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let head_len = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed mid-request");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_len]).into_owned();
        let mut lines = head.split("\r\n");
        let mut request_line = lines.next().unwrap_or_default().split_whitespace();
        let method = request_line.next().unwrap_or_default().to_string();
        let target = request_line.next().unwrap_or_default().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(key, value)| (key.trim().to_ascii_lowercase(), value.trim().to_string()))
            .collect();

        let content_length = headers
            .iter()
            .find(|(key, _)| key == "content-length")
            .and_then(|(_, value)| value.parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < head_len + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed mid-body");
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = String::from_utf8_lossy(&buf[head_len..head_len + content_length]).into_owned();

        Recorded {
            method,
            target,
            headers,
            body,
        }
    }

    fn service_at(api: &LocalApi, credentials: impl Into<Credentials>) -> SheetService {
        SheetService::builder()
            .spreadsheet_id("abc123")
            .credentials(credentials)
            .endpoint(api.endpoint())
            .http_client(reqwest::Client::builder().no_proxy().build().unwrap())
            .build()
            .unwrap()
    }

    fn account_at(api: &LocalApi) -> ServiceAccount {
        let mut account = ServiceAccount::from_json(KEY_JSON).unwrap();
        account.token_uri = format!("{}/token", api.base);
        account
    }

    fn service(endpoint: &str) -> SheetService {
        SheetService::builder()
            .spreadsheet_id("abc123")
            .credentials(Credentials::AccessToken("token".to_string()))
            .endpoint(endpoint)
            .build()
            .unwrap()
    }

    fn query(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_values_url() {
        let svc = service(DEFAULT_ENDPOINT);
        let url = svc.values_url("Sheet1!A1:C10").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Sheet1!A1:C10?valueRenderOption=UNFORMATTED_VALUE"
        );
    }

    #[test]
    fn test_values_url_escapes_range() {
        let svc = service("http://localhost:8080/v4/");
        let url = svc.values_url("'My Sheet'!A:A").unwrap();
        assert_eq!(
            url.path(),
            "/v4/spreadsheets/abc123/values/'My%20Sheet'!A:A"
        );
    }

    #[test]
    fn test_batch_get_url() {
        let svc = service(DEFAULT_ENDPOINT);
        let url = svc
            .batch_get_url(&["A!A1:B2".to_string(), "B!C:C".to_string()])
            .unwrap();
        assert_eq!(url.path(), "/v4/spreadsheets/abc123/values:batchGet");
        assert_eq!(
            query(&url),
            vec![
                ("ranges".to_string(), "A!A1:B2".to_string()),
                ("ranges".to_string(), "B!C:C".to_string()),
                ("valueRenderOption".to_string(), VALUE_RENDER_OPTION.to_string()),
            ]
        );
    }

    #[test]
    fn test_sheet_range() {
        let svc = service(DEFAULT_ENDPOINT);
        assert_eq!(svc.sheet_range("Orders", "A1:F500"), "Orders!A1:F500");
    }

    #[test]
    fn test_builder_requires_fields() {
        assert!(matches!(
            SheetService::builder()
                .credentials(Credentials::AccessToken("t".to_string()))
                .build(),
            Err(SheetError::Config(_))
        ));
        assert!(matches!(
            SheetService::builder().spreadsheet_id("abc").build(),
            Err(SheetError::Config(_))
        ));
        assert!(matches!(
            SheetService::builder()
                .spreadsheet_id("abc")
                .credentials(Credentials::AccessToken("t".to_string()))
                .endpoint("not a url")
                .build(),
            Err(SheetError::Config(_))
        ));
    }

    #[test]
    fn test_parse_value_range() {
        let body = r#"{
            "range": "Sheet1!A1:C3",
            "majorDimension": "ROWS",
            "values": [["id", "name", "joined"], [1, "Alice", 45000.5], [2, "Bob"]]
        }"#;
        let parsed: ValueRange = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.values.len(), 3);
        assert_eq!(parsed.values[1][2], CellValue::Float(45000.5));
        assert_eq!(parsed.values[2].len(), 2);
    }

    #[test]
    fn test_parse_empty_range() {
        let parsed: ValueRange =
            serde_json::from_str(r#"{"range": "Sheet1!A1:C3", "majorDimension": "ROWS"}"#)
                .unwrap();
        assert!(parsed.values.is_empty());

        let batch: BatchGetResponse = serde_json::from_str(
            r#"{"spreadsheetId": "abc", "valueRanges": [{"range": "A!A1"}, {"range": "B!A1", "values": [["x"]]}]}"#,
        )
        .unwrap();
        assert_eq!(batch.value_ranges.len(), 2);
        assert!(batch.value_ranges[0].values.is_empty());
        assert_eq!(batch.value_ranges[1].values[0][0], CellValue::from("x"));
    }

    #[test]
    fn test_parse_error_message() {
        let body = r#"{"error": {"code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND"}}"#;
        assert_eq!(parse_error_message(body), "Requested entity was not found.");
        assert_eq!(parse_error_message("  bad gateway \n"), "bad gateway");
    }

    #[tokio::test]
    async fn test_static_token_is_used_as_is() {
        let svc = service(DEFAULT_ENDPOINT);
        assert_eq!(svc.access_token().await.unwrap(), "token");
    }

    #[tokio::test]
    async fn test_cached_token_is_reused() {
        let account = ServiceAccount::from_json(KEY_JSON).unwrap();
        let svc = SheetService::builder()
            .spreadsheet_id("abc123")
            .credentials(account)
            .build()
            .unwrap();
        *svc.token.lock().await = Some(CachedToken {
            token: "cached".to_string(),
            refresh_at: Utc::now() + Duration::minutes(30),
        });
        assert_eq!(svc.access_token().await.unwrap(), "cached");
    }

    #[test]
    fn test_refresh_deadline() {
        let now = Utc::now();
        assert_eq!(
            refresh_deadline(now, 3600).unwrap(),
            now + Duration::seconds(3600 - TOKEN_EXPIRY_MARGIN_SECS)
        );
        assert!(refresh_deadline(now, 0).unwrap() < now);
    }

    #[test]
    fn test_refresh_deadline_rejects_huge_lifetimes() {
        let now = Utc::now();
        for expires_in in [i64::MAX, i64::MAX / 10, i64::MIN, 1 << 50] {
            assert!(
                matches!(
                    refresh_deadline(now, expires_in),
                    Err(SheetError::Credentials(_))
                ),
                "accepted {}",
                expires_in
            );
        }
    }

    #[tokio::test]
    async fn test_get_sends_bearer_request() {
        let api = LocalApi::start(|_| {
            (
                200,
                r#"{"range": "Orders!A1:B3", "majorDimension": "ROWS", "values": [["id", "name"], [1, "Alice"], [2]]}"#
                    .to_string(),
            )
        })
        .await;
        let svc = service_at(&api, Credentials::AccessToken("static-token".to_string()));

        let grid = svc.get("Orders!A1:B3").await.unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[1][1], CellValue::from("Alice"));
        assert_eq!(grid[2], vec![CellValue::Int(2)]);

        let requests = api.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(
            requests[0].target,
            "/v4/spreadsheets/abc123/values/Orders!A1:B3?valueRenderOption=UNFORMATTED_VALUE"
        );
        assert_eq!(requests[0].header("authorization"), Some("Bearer static-token"));
    }

    #[tokio::test]
    async fn test_batch_get_returns_grids_in_order() {
        let api = LocalApi::start(|_| {
            (
                200,
                r#"{"spreadsheetId": "abc123", "valueRanges": [
                    {"range": "Empty!A1:A1", "majorDimension": "ROWS"},
                    {"range": "Orders!A1:A2", "majorDimension": "ROWS", "values": [["id"], [7]]}
                ]}"#
                .to_string(),
            )
        })
        .await;
        let svc = service_at(&api, Credentials::AccessToken("static-token".to_string()));

        let grids = svc
            .batch_get(&["Empty!A1:A1".to_string(), "Orders!A1:A2".to_string()])
            .await
            .unwrap();
        assert_eq!(grids.len(), 2);
        assert!(grids[0].is_empty());
        assert_eq!(grids[1][1][0], CellValue::Int(7));

        let requests = api.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].target,
            "/v4/spreadsheets/abc123/values:batchGet?ranges=Empty%21A1%3AA1&ranges=Orders%21A1%3AA2&valueRenderOption=UNFORMATTED_VALUE"
        );
    }

    #[tokio::test]
    async fn test_error_status_becomes_api_error() {
        let api = LocalApi::start(|_| {
            (
                404,
                r#"{"error": {"code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND"}}"#
                    .to_string(),
            )
        })
        .await;
        let svc = service_at(&api, Credentials::AccessToken("static-token".to_string()));

        match svc.get("Orders!A:A").await {
            Err(SheetError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Requested entity was not found.");
            }
            other => panic!("expected an API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_token_exchange_then_reuse() {
        let api = LocalApi::start(|request| {
            if request.target.starts_with("/token") {
                (
                    200,
                    r#"{"access_token": "ya29.fresh", "expires_in": 3599, "token_type": "Bearer"}"#
                        .to_string(),
                )
            } else {
                (200, r#"{"values": [["id"], [1]]}"#.to_string())
            }
        })
        .await;
        let svc = service_at(&api, account_at(&api));

        assert_eq!(svc.get("A!A1:A2").await.unwrap().len(), 2);
        assert_eq!(svc.get("A!A1:A2").await.unwrap().len(), 2);

        let requests = api.requests();
        assert_eq!(requests.len(), 3);

        let exchange = &requests[0];
        assert_eq!(exchange.method, "POST");
        assert_eq!(exchange.target, "/token");
        assert_eq!(
            exchange.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert!(exchange
            .body
            .starts_with("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer&assertion="));
        let assertion = exchange.body.split("assertion=").nth(1).unwrap();
        assert_eq!(assertion.split('.').count(), 3);

        for request in &requests[1..] {
            assert_eq!(request.method, "GET");
            assert_eq!(request.header("authorization"), Some("Bearer ya29.fresh"));
        }
    }

    #[tokio::test]
    async fn test_unusable_token_lifetime_is_an_error() {
        let api = LocalApi::start(|request| {
            if request.target.starts_with("/token") {
                (
                    200,
                    format!(
                        r#"{{"access_token": "ya29.odd", "expires_in": {}}}"#,
                        i64::MAX / 10
                    ),
                )
            } else {
                (200, r#"{"values": []}"#.to_string())
            }
        })
        .await;
        let svc = service_at(&api, account_at(&api));

        assert!(matches!(
            svc.get("A!A1").await,
            Err(SheetError::Credentials(_))
        ));
        assert!(svc.token.lock().await.is_none());
        assert_eq!(api.requests().len(), 1);
    }
}
