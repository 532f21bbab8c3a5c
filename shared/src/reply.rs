use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::{GeoPoint, QueryError};

/// What a transport hands back once a query settles.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpReply {
    Completed { status: u16, body: String },
    TransportFailed(String),
}

impl HttpReply {
    pub fn ok(body: impl Into<String>) -> Self {
        HttpReply::Completed {
            status: 200,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RouteCost {
    Value(f64),
    /// Preformatted by the service, e.g. `"1 h 12 min"`.
    Label(String),
}

impl fmt::Display for RouteCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteCost::Value(value) => write!(f, "{value:?}"),
            RouteCost::Label(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteResult {
    Found {
        points: Vec<GeoPoint>,
        cost: Option<RouteCost>,
    },
    NotFound,
    RequestInvalid,
}

impl RouteResult {
    /// Collapses every failure into `RequestInvalid`.
    pub fn from_reply(reply: &HttpReply) -> Self {
        check_reply(reply).unwrap_or_else(|err| {
            tracing::warn!("route query failed: {err}");
            RouteResult::RequestInvalid
        })
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RouteResult::Found { .. })
    }
}

pub fn check_reply(reply: &HttpReply) -> Result<RouteResult, QueryError> {
    match reply {
        HttpReply::TransportFailed(reason) => Err(QueryError::Transport(reason.clone())),
        HttpReply::Completed { status, .. } if !(200..300).contains(status) => {
            Err(QueryError::Status(*status))
        }
        HttpReply::Completed { body, .. } => parse_route_body(body),
    }
}

/// Normalizes either accepted response shape into a [`RouteResult`].
///
/// An object carrying `features` is read as a GeoJSON `FeatureCollection`,
/// any other object as the flat `{path, cost}` shape. An empty path in
/// either shape means no route exists.
pub fn parse_route_body(body: &str) -> Result<RouteResult, QueryError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Object(fields) = &value else {
        return Err(QueryError::MalformedResponse(
            "expected a JSON object".to_string(),
        ));
    };

    if fields.contains_key("features") {
        let collection: FeatureCollection = serde_json::from_value(value)?;
        collection.into_result()
    } else {
        let flat: FlatResponse = serde_json::from_value(value)?;
        flat.into_result()
    }
}

#[derive(Deserialize)]
struct FlatResponse {
    #[serde(default)]
    path: Option<FlatPath>,
    #[serde(default)]
    cost: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlatPath {
    Points(Vec<GeoPoint>),
    Sentinel(String),
}

impl FlatResponse {
    fn into_result(self) -> Result<RouteResult, QueryError> {
        let points = match self.path {
            None => Vec::new(),
            Some(FlatPath::Points(points)) => points,
            Some(FlatPath::Sentinel(text)) if text.is_empty() => Vec::new(),
            Some(FlatPath::Sentinel(text)) => {
                return Err(QueryError::MalformedResponse(format!(
                    "unexpected path value {text:?}"
                )));
            }
        };
        if points.is_empty() {
            return Ok(RouteResult::NotFound);
        }
        Ok(RouteResult::Found {
            points,
            cost: self.cost.map(RouteCost::Value),
        })
    }
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Option<Properties>,
}

#[derive(Deserialize)]
struct Geometry {
    coordinates: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct Properties {
    #[serde(default)]
    weight: Option<RouteCost>,
}

impl FeatureCollection {
    fn into_result(self) -> Result<RouteResult, QueryError> {
        let Some(feature) = self.features.into_iter().next() else {
            return Ok(RouteResult::NotFound);
        };

        let points = feature
            .geometry
            .coordinates
            .iter()
            .map(|position| match position.as_slice() {
                [lon, lat, ..] => Ok(GeoPoint::from_lon_lat([*lon, *lat])),
                _ => Err(QueryError::MalformedResponse(format!(
                    "position needs longitude and latitude, got {position:?}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if points.is_empty() {
            return Ok(RouteResult::NotFound);
        }
        Ok(RouteResult::Found {
            points,
            cost: feature.properties.and_then(|props| props.weight),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(reply: &HttpReply) -> (Vec<GeoPoint>, Option<RouteCost>) {
        match check_reply(reply) {
            Ok(RouteResult::Found { points, cost }) => (points, cost),
            other => panic!("expected a route, got {other:?}"),
        }
    }

    #[test]
    fn flat_path_with_cost() {
        let reply = HttpReply::ok(
            r#"{"path":[{"latitude":0.0,"longitude":0.0},{"latitude":1.0,"longitude":1.0},{"latitude":2.0,"longitude":2.0}],"cost":42.0}"#,
        );
        let (points, cost) = found(&reply);

        assert_eq!(
            points,
            vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(1.0, 1.0),
                GeoPoint::new(2.0, 2.0)
            ]
        );
        assert_eq!(cost, Some(RouteCost::Value(42.0)));
        assert_eq!(cost.unwrap().to_string(), "42.0");
    }

    #[test]
    fn flat_path_without_cost() {
        let reply = HttpReply::ok(r#"{"path":[{"latitude":1.5,"longitude":2.5}]}"#);
        let (points, cost) = found(&reply);
        assert_eq!(points, vec![GeoPoint::new(1.5, 2.5)]);
        assert_eq!(cost, None);
    }

    #[test]
    fn empty_path_variants_mean_no_route() {
        for body in [
            r#"{"path":[],"cost":0.0}"#,
            r#"{"path":""}"#,
            r#"{"path":null}"#,
            r#"{"cost":3.0}"#,
        ] {
            assert_eq!(
                check_reply(&HttpReply::ok(body)),
                Ok(RouteResult::NotFound),
                "body {body}"
            );
        }
    }

    #[test]
    fn feature_collection_with_label_weight() {
        let reply = HttpReply::ok(
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"LineString","coordinates":[[9.18,48.77],[9.19,48.78]]},"properties":{"weight":"1 h 5 min"}}]}"#,
        );
        let (points, cost) = found(&reply);

        assert_eq!(
            points,
            vec![GeoPoint::new(48.77, 9.18), GeoPoint::new(48.78, 9.19)]
        );
        assert_eq!(cost, Some(RouteCost::Label("1 h 5 min".to_string())));
    }

    #[test]
    fn feature_collection_with_numeric_weight() {
        let reply = HttpReply::ok(
            r#"{"features":[{"geometry":{"coordinates":[[1.0,2.0,310.0]]},"properties":{"weight":12.5}}]}"#,
        );
        let (points, cost) = found(&reply);
        assert_eq!(points, vec![GeoPoint::new(2.0, 1.0)]);
        assert_eq!(cost.unwrap().to_string(), "12.5");
    }

    #[test]
    fn feature_collection_without_coordinates_means_no_route() {
        let reply = HttpReply::ok(
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"LineString","coordinates":[]},"properties":{"weight":"no path found"}}]}"#,
        );
        assert_eq!(check_reply(&reply), Ok(RouteResult::NotFound));
        assert_eq!(
            check_reply(&HttpReply::ok(r#"{"features":[]}"#)),
            Ok(RouteResult::NotFound)
        );
    }

    #[test]
    fn malformed_bodies_are_rejected() {
        for body in [
            "not json",
            "[]",
            r#"{"path":"nowhere"}"#,
            r#"{"path":[{"latitude":"north"}]}"#,
            r#"{"features":[{"properties":{}}]}"#,
            r#"{"features":[{"geometry":{"coordinates":[[1.0]]}}]}"#,
        ] {
            let err = check_reply(&HttpReply::ok(body)).unwrap_err();
            assert!(
                matches!(err, QueryError::MalformedResponse(_)),
                "body {body} gave {err:?}"
            );
        }
    }

    #[test]
    fn non_success_status_and_transport_failures() {
        let reply = HttpReply::Completed {
            status: 500,
            body: r#"{"path":[]}"#.to_string(),
        };
        assert_eq!(check_reply(&reply), Err(QueryError::Status(500)));
        assert_eq!(RouteResult::from_reply(&reply), RouteResult::RequestInvalid);

        let reply = HttpReply::TransportFailed("connection refused".to_string());
        assert!(check_reply(&reply).unwrap_err().is_invalid_request());
        assert_eq!(RouteResult::from_reply(&reply), RouteResult::RequestInvalid);
    }

    #[test]
    fn malformed_success_collapses_to_invalid() {
        assert_eq!(
            RouteResult::from_reply(&HttpReply::ok("<html>")),
            RouteResult::RequestInvalid
        );
    }
}
