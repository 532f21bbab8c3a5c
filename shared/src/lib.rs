pub mod client;
pub mod error;
pub mod map;
pub mod reply;
pub mod selection;

use serde::{Deserialize, Serialize};
use serde_json::json;

pub use client::{DispatchedQuery, QueryTicket, RouteQueryClient, StatusBanner};
pub use error::QueryError;
pub use map::{EndpointRole, MapSurface, MarkerKind, Overlays};
pub use reply::{HttpReply, RouteCost, RouteResult, check_reply, parse_route_body};
pub use selection::{ClientState, ReselectPolicy, SelectionState};

/// Path of the shortest-path endpoint, relative to the service base URL.
pub const ROUTE_ENDPOINT: &str = "dijkstra";

/// Content type the routing service expects on query bodies.
pub const QUERY_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// GeoJSON position order.
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    pub fn from_lon_lat([longitude, latitude]: [f64; 2]) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelMode {
    Car,
    #[default]
    Foot,
}

impl TravelMode {
    /// Reads the travel-mode selector. Only `car` selects driving.
    pub fn from_control(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("car") {
            TravelMode::Car
        } else {
            TravelMode::Foot
        }
    }

    pub fn as_control(self) -> &'static str {
        match self {
            TravelMode::Car => "car",
            TravelMode::Foot => "foot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Criterion {
    Distance,
    #[default]
    Time,
}

impl Criterion {
    /// Reads the optimization selector. Only `distance` optimizes by length.
    pub fn from_control(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("distance") {
            Criterion::Distance
        } else {
            Criterion::Time
        }
    }

    pub fn as_control(self) -> &'static str {
        match self {
            Criterion::Distance => "distance",
            Criterion::Time => "time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteOptions {
    pub use_car: bool,
    #[serde(rename = "by_distance")]
    pub optimize_by_distance: bool,
}

impl RouteOptions {
    pub fn new(mode: TravelMode, criterion: Criterion) -> Self {
        Self {
            use_car: mode == TravelMode::Car,
            optimize_by_distance: criterion == Criterion::Distance,
        }
    }

    pub fn from_controls(mode: &str, criterion: &str) -> Self {
        Self::new(
            TravelMode::from_control(mode),
            Criterion::from_control(criterion),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub start: GeoPoint,
    pub end: GeoPoint,
    #[serde(flatten)]
    pub options: RouteOptions,
}

/// Wire shape of the outbound query body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestEncoding {
    /// `{start, end, use_car, by_distance}`
    #[default]
    Canonical,
    /// GeoJSON collection of two `Point` features, as accepted by the older
    /// service build. Options travel in the collection's `properties`.
    FeatureCollection,
}

impl RequestEncoding {
    pub fn from_config(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "canonical" | "flat" => Some(RequestEncoding::Canonical),
            "feature-collection" | "geojson" => Some(RequestEncoding::FeatureCollection),
            _ => None,
        }
    }
}

impl RouteQuery {
    pub fn to_body(&self, encoding: RequestEncoding) -> Result<String, QueryError> {
        let encoded = match encoding {
            RequestEncoding::Canonical => serde_json::to_string(self),
            RequestEncoding::FeatureCollection => {
                let point = |p: GeoPoint| {
                    json!({
                        "type": "Feature",
                        "geometry": { "type": "Point", "coordinates": p.to_lon_lat() }
                    })
                };
                serde_json::to_string(&json!({
                    "type": "FeatureCollection",
                    "features": [point(self.start), point(self.end)],
                    "properties": self.options,
                }))
            }
        };
        encoded.map_err(|err| QueryError::Encode(err.to_string()))
    }
}
