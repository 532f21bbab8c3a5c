use serde_wasm_bindgen::to_value;
use shared::{GeoPoint, MapSurface, MarkerKind};
use wasm_bindgen::prelude::{JsValue, wasm_bindgen};

#[wasm_bindgen(module = "/leaflet_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    pub fn init_map();
    #[wasm_bindgen(js_name = addMarker)]
    fn add_marker_js(lat: f64, lng: f64, kind: &str) -> u32;
    #[wasm_bindgen(js_name = addPolyline)]
    fn add_polyline_js(latlngs: JsValue) -> u32;
    #[wasm_bindgen(js_name = removeLayer)]
    fn remove_layer_js(id: u32);
}

/// Id of a layer registered in the JS bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerId(u32);

/// Leaflet map living in the `#map` element.
#[derive(Debug, Default)]
pub struct LeafletMap;

impl MapSurface for LeafletMap {
    type Layer = LayerId;

    fn add_marker(&mut self, at: GeoPoint, kind: MarkerKind) -> LayerId {
        LayerId(add_marker_js(at.latitude, at.longitude, marker_icon(kind)))
    }

    fn add_polyline(&mut self, points: &[GeoPoint]) -> LayerId {
        let latlngs = to_value(&leaflet_latlngs(points)).unwrap_or(JsValue::NULL);
        LayerId(add_polyline_js(latlngs))
    }

    fn remove_layer(&mut self, layer: LayerId) {
        remove_layer_js(layer.0);
    }
}

fn marker_icon(kind: MarkerKind) -> &'static str {
    match kind {
        MarkerKind::Temporary => "temporary",
        MarkerKind::Start => "start",
        MarkerKind::End => "end",
    }
}

// Leaflet wants [lat, lng], unlike GeoJSON.
fn leaflet_latlngs(points: &[GeoPoint]) -> Vec<[f64; 2]> {
    points
        .iter()
        .map(|point| [point.latitude, point.longitude])
        .collect()
}
