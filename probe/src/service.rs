use std::time::Duration;

use reqwest::{Client, header::CONTENT_TYPE};
use shared::{HttpReply, QUERY_CONTENT_TYPE, ROUTE_ENDPOINT, RequestEncoding, RouteQuery};

use crate::ProbeError;

/// HTTP transport to the shortest-path service.
pub struct ServiceClient {
    http: Client,
    endpoint: String,
    encoding: RequestEncoding,
}

impl ServiceClient {
    pub fn new(
        base_url: &str,
        encoding: RequestEncoding,
        timeout: Duration,
    ) -> Result<Self, ProbeError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/{ROUTE_ENDPOINT}", base_url.trim_end_matches('/')),
            encoding,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts one query. Every failure is folded into the returned reply so
    /// the caller interprets it like any other settled query.
    pub async fn post_query(&self, query: &RouteQuery) -> HttpReply {
        let body = match query.to_body(self.encoding) {
            Ok(body) => body,
            Err(err) => return HttpReply::TransportFailed(err.to_string()),
        };
        tracing::debug!("POST {} {body}", self.endpoint);

        let response = match self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, QUERY_CONTENT_TYPE)
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("request to {} failed: {err}", self.endpoint);
                return HttpReply::TransportFailed(err.to_string());
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => {
                tracing::debug!("service answered {status} with {} bytes", body.len());
                HttpReply::Completed { status, body }
            }
            Err(err) => HttpReply::TransportFailed(err.to_string()),
        }
    }
}
