use std::collections::BTreeMap;

use shared::{GeoPoint, MapSurface, MarkerKind};

/// Map surface for headless runs: keeps track of live layers and logs
/// every draw and removal.
#[derive(Debug, Default)]
pub struct ConsoleMap {
    next_id: u64,
    live: BTreeMap<u64, String>,
}

impl ConsoleMap {
    pub fn live_layers(&self) -> usize {
        self.live.len()
    }

    pub fn describe(&self) -> Vec<String> {
        self.live.values().cloned().collect()
    }

    fn insert(&mut self, description: String) -> u64 {
        self.next_id += 1;
        tracing::debug!("layer {} added: {description}", self.next_id);
        self.live.insert(self.next_id, description);
        self.next_id
    }
}

impl MapSurface for ConsoleMap {
    type Layer = u64;

    fn add_marker(&mut self, at: GeoPoint, kind: MarkerKind) -> u64 {
        self.insert(format!(
            "{kind:?} marker at {:.5},{:.5}",
            at.latitude, at.longitude
        ))
    }

    fn add_polyline(&mut self, points: &[GeoPoint]) -> u64 {
        self.insert(format!("route line through {} points", points.len()))
    }

    fn remove_layer(&mut self, layer: u64) {
        match self.live.remove(&layer) {
            Some(description) => tracing::debug!("layer {layer} removed: {description}"),
            None => tracing::warn!("layer {layer} removed but was not live"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_live_layers() {
        let mut map = ConsoleMap::default();
        let marker = map.add_marker(GeoPoint::new(51.0, 10.0), MarkerKind::Start);
        let line = map.add_polyline(&[GeoPoint::new(51.0, 10.0), GeoPoint::new(52.0, 11.0)]);
        assert_eq!(map.live_layers(), 2);

        map.remove_layer(marker);
        assert_eq!(map.describe(), vec!["route line through 2 points".to_string()]);

        map.remove_layer(line);
        map.remove_layer(line);
        assert_eq!(map.live_layers(), 0);
    }
}
