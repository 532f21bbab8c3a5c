pub mod console_map;
pub mod service;

use std::{fmt, time::Duration};

use serde::Serialize;
use shared::{
    GeoPoint, QueryError, RequestEncoding, ReselectPolicy, RouteOptions, RouteQueryClient,
    RouteResult,
};
use thiserror::Error;

pub use console_map::ConsoleMap;
pub use service::ServiceClient;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid coordinate {0:?}, expected `lat,lon`")]
    InvalidCoordinate(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Parses `lat,lon`.
pub fn parse_point(value: &str) -> Result<GeoPoint, ProbeError> {
    let invalid = || ProbeError::InvalidCoordinate(value.to_string());
    let (lat, lon) = value.split_once(',').ok_or_else(invalid)?;
    let latitude = lat.trim().parse::<f64>().map_err(|_| invalid())?;
    let longitude = lon.trim().parse::<f64>().map_err(|_| invalid())?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(invalid());
    }
    Ok(GeoPoint::new(latitude, longitude))
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub service_url: String,
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub options: RouteOptions,
    pub encoding: RequestEncoding,
    pub timeout: Duration,
    pub repeat: usize,
}

impl ProbeConfig {
    pub fn new(service_url: impl Into<String>, start: GeoPoint, end: GeoPoint) -> Self {
        Self {
            service_url: service_url.into(),
            start,
            end,
            options: RouteOptions::default(),
            encoding: RequestEncoding::default(),
            timeout: Duration::from_secs(15),
            repeat: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub endpoint: String,
    pub queries: usize,
    pub outcome: &'static str,
    pub banner: Option<&'static str>,
    pub result: Option<String>,
    pub route: Vec<GeoPoint>,
    /// Every repetition displayed the same route.
    pub stable: bool,
    pub live_layers: usize,
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "endpoint: {}", self.endpoint)?;
        writeln!(f, "queries:  {}", self.queries)?;
        writeln!(f, "outcome:  {}", self.outcome)?;
        if let Some(banner) = self.banner {
            writeln!(f, "status:   {banner}")?;
        }
        if let Some(result) = &self.result {
            writeln!(f, "result:   {result}")?;
        }
        if self.queries > 1 {
            writeln!(f, "stable:   {}", self.stable)?;
        }
        for (idx, point) in self.route.iter().enumerate() {
            writeln!(f, "{idx:>5}: {:.6} {:.6}", point.latitude, point.longitude)?;
        }
        Ok(())
    }
}

fn outcome_label(result: &RouteResult) -> &'static str {
    match result {
        RouteResult::Found { .. } => "found",
        RouteResult::NotFound => "not-found",
        RouteResult::RequestInvalid => "invalid-request",
    }
}

/// Clicks `start` then `end` into a headless client, sends every query it
/// dispatches and reports what the map ends up showing.
pub async fn run(config: &ProbeConfig) -> Result<ProbeReport, ProbeError> {
    let service = ServiceClient::new(&config.service_url, config.encoding, config.timeout)?;
    let mut client = RouteQueryClient::new(ConsoleMap::default(), ReselectPolicy::Restart);

    client.on_map_click(config.start, config.options);
    let mut next = client.on_map_click(config.end, config.options);

    let mut displayed: Vec<Option<Vec<GeoPoint>>> = Vec::new();
    let mut outcome = "pending";
    for round in 0..config.repeat.max(1) {
        if round > 0 {
            next = client.requery(config.options);
        }
        let dispatched = next.take().ok_or(QueryError::PreconditionNotMet)?;

        tracing::info!(
            "query {} of {}: {:?} -> {:?}",
            round + 1,
            config.repeat.max(1),
            dispatched.query.start,
            dispatched.query.end
        );
        let reply = service.post_query(&dispatched.query).await;
        if let Some(result) = client.on_query_settled(dispatched.ticket, &reply) {
            outcome = outcome_label(&result);
            tracing::info!("query settled: {outcome}");
        }
        displayed.push(client.displayed_route().map(<[GeoPoint]>::to_vec));
    }

    Ok(ProbeReport {
        endpoint: service.endpoint().to_string(),
        queries: displayed.len(),
        outcome,
        banner: client.banner().map(|banner| banner.message()),
        result: client.result_text(),
        route: client.displayed_route().map(<[GeoPoint]>::to_vec).unwrap_or_default(),
        stable: displayed.windows(2).all(|pair| pair[0] == pair[1]),
        live_layers: client.map().live_layers(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_point_accepts_lat_lon() {
        assert_eq!(
            parse_point("48.7758, 9.1829").unwrap(),
            GeoPoint::new(48.7758, 9.1829)
        );
        assert_eq!(
            parse_point("-33.92,18.42").unwrap(),
            GeoPoint::new(-33.92, 18.42)
        );
    }

    #[test]
    fn parse_point_rejects_garbage() {
        for value in ["48.7", "north,east", "1,2,3", "NaN,1", ""] {
            assert!(
                matches!(parse_point(value), Err(ProbeError::InvalidCoordinate(_))),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn report_renders_route_lines() {
        let report = ProbeReport {
            endpoint: "http://localhost:8080/dijkstra".to_string(),
            queries: 1,
            outcome: "found",
            banner: None,
            result: Some("42.0".to_string()),
            route: vec![GeoPoint::new(1.0, 2.0)],
            stable: true,
            live_layers: 3,
        };
        let rendered = report.to_string();
        assert!(rendered.contains("outcome:  found"));
        assert!(rendered.contains("result:   42.0"));
        assert!(rendered.contains("    0: 1.000000 2.000000"));
        assert!(!rendered.contains("stable"));
    }
}
