use crate::error::{FetchError, Result};
use crate::flatten::{self, FlatRow};
use crate::query::QuerySpec;
use crate::response::{Endpoint, QueryResult};

/// Response header carrying the API's diagnostic for 400/500 answers. It is
/// the only detail channel the API offers; the body is not useful there.
pub const STATUS_REASON_HEADER: &str = "x-status-reason";

/// A wire response before any validation or decoding.
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Single-shot query client: build, execute, validate, decode, parse,
/// flatten. Every step is a stateless transformation; nothing is shared
/// across calls beyond the reqwest connection pool.
pub struct QueryClient {
    http: reqwest::Client,
    endpoint: Endpoint,
}

impl QueryClient {
    pub fn new(endpoint: Endpoint) -> QueryClient {
        QueryClient {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Client for the patents entity at the configured base URL.
    pub fn patents() -> QueryClient {
        QueryClient::new(Endpoint::patents())
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Encode a spec into the `q`/`f`/`o` parameters for this endpoint.
    pub fn build_request(&self, spec: &QuerySpec) -> Vec<(&'static str, String)> {
        spec.to_params()
    }

    /// One GET round trip. No retry and no implicit timeout; a bound, if
    /// wanted, belongs on the underlying `reqwest::Client`.
    pub async fn execute(&self, params: &[(&'static str, String)]) -> Result<RawResponse> {
        log::info!("querying {}", self.endpoint.base_url);
        let response = self
            .http
            .get(&self.endpoint.base_url)
            .query(params)
            .send()
            .await?;

        let status = response.status().as_u16();
        let reason = header_value(&response, STATUS_REASON_HEADER);
        let content_type = header_value(&response, "content-type");
        let body = response.bytes().await?.to_vec();
        log::debug!("status {status}, {} body bytes", body.len());

        Ok(RawResponse {
            status,
            reason,
            content_type,
            body,
        })
    }

    /// 200 is the only success. 400 and 500 map to their named errors with
    /// the header-carried reason attached; anything else is surfaced as-is.
    pub fn validate_status(&self, raw: &RawResponse) -> Result<()> {
        match raw.status {
            200 => Ok(()),
            400 => Err(FetchError::InvalidQuery {
                reason: raw.reason.clone(),
            }),
            500 => Err(FetchError::ServerError {
                reason: raw.reason.clone(),
            }),
            code => Err(FetchError::UnexpectedStatus {
                code,
                reason: raw.reason.clone(),
            }),
        }
    }

    /// Decode body bytes with the charset the server declared, defaulting
    /// to UTF-8. A declared charset this client cannot decode is an error,
    /// not a guess.
    pub fn decode(&self, raw: &RawResponse) -> Result<String> {
        let charset = raw.content_type.as_deref().and_then(declared_charset);
        match charset.as_deref() {
            None | Some("utf-8") | Some("utf8") | Some("us-ascii") => {
                String::from_utf8(raw.body.clone())
                    .map_err(|e| FetchError::DecodeError(format!("body is not valid UTF-8: {e}")))
            }
            Some(other) => Err(FetchError::DecodeError(format!(
                "unsupported charset `{other}`"
            ))),
        }
    }

    pub fn parse(&self, text: &str) -> Result<QueryResult> {
        QueryResult::parse(&self.endpoint, text)
    }

    /// The full pipeline short of flattening.
    pub async fn fetch(&self, spec: &QuerySpec) -> Result<QueryResult> {
        let params = self.build_request(spec);
        let raw = self.execute(&params).await?;
        self.validate_status(&raw)?;
        let text = self.decode(&raw)?;
        let result = self.parse(&text)?;
        log::info!(
            "{} of {} matching records returned",
            result.count,
            result.total
        );
        Ok(result)
    }

    /// Single bulk fetch, flattened. This never pages: when `total` exceeds
    /// `per_page`, the caller raises `per_page` or issues more requests.
    pub async fn fetch_all(&self, spec: QuerySpec, per_page: u64) -> Result<Vec<FlatRow>> {
        let result = self.fetch(&spec.per_page(per_page)).await?;
        if result.count < result.total {
            log::warn!(
                "single page returned {} of {} matching records",
                result.count,
                result.total
            );
        }
        Ok(flatten::flatten(&result))
    }
}

fn header_value(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn declared_charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_ascii_lowercase())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, reason: Option<&str>) -> RawResponse {
        RawResponse {
            status,
            reason: reason.map(str::to_string),
            content_type: Some("application/json".to_string()),
            body: Vec::new(),
        }
    }

    fn client() -> QueryClient {
        QueryClient::new(Endpoint::patents_at("http://localhost/patents/query"))
    }

    #[test]
    fn test_validate_status_taxonomy() {
        let client = client();

        assert!(client.validate_status(&raw(200, None)).is_ok());

        match client.validate_status(&raw(400, Some("invalid field: xyz"))) {
            Err(FetchError::InvalidQuery { reason }) => {
                assert_eq!(reason.as_deref(), Some("invalid field: xyz"));
            }
            other => panic!("expected InvalidQuery, got {other:?}"),
        }

        assert!(matches!(
            client.validate_status(&raw(500, None)),
            Err(FetchError::ServerError { reason: None })
        ));
        assert!(matches!(
            client.validate_status(&raw(503, None)),
            Err(FetchError::UnexpectedStatus { code: 503, .. })
        ));
    }

    #[test]
    fn test_decode_charsets() {
        let client = client();

        let mut utf8 = raw(200, None);
        utf8.body = "{\"ok\": true}".as_bytes().to_vec();
        assert_eq!(client.decode(&utf8).unwrap(), "{\"ok\": true}");

        let mut declared = raw(200, None);
        declared.content_type = Some("application/json; charset=UTF-8".to_string());
        declared.body = "{}".as_bytes().to_vec();
        assert_eq!(client.decode(&declared).unwrap(), "{}");

        let mut exotic = raw(200, None);
        exotic.content_type = Some("application/json; charset=iso-8859-1".to_string());
        assert!(matches!(
            client.decode(&exotic),
            Err(FetchError::DecodeError(_))
        ));

        let mut invalid = raw(200, None);
        invalid.body = vec![0xff, 0xfe, 0xfd];
        assert!(matches!(
            client.decode(&invalid),
            Err(FetchError::DecodeError(_))
        ));
    }
}
