//! Forwarding layer between domain data and whatever draws the map.

use crate::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Temporary,
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Start,
    End,
}

impl EndpointRole {
    pub fn marker_kind(self) -> MarkerKind {
        match self {
            EndpointRole::Start => MarkerKind::Start,
            EndpointRole::End => MarkerKind::End,
        }
    }
}

/// Drawing capabilities consumed from the map library.
///
/// A `Layer` is an opaque handle to something already on the map. The
/// surface owns the rendered pixels; callers own the handles and hand each
/// one back exactly once through [`MapSurface::remove_layer`].
pub trait MapSurface {
    type Layer;

    fn add_marker(&mut self, at: GeoPoint, kind: MarkerKind) -> Self::Layer;

    /// Draws one connected line through `points` in order.
    fn add_polyline(&mut self, points: &[GeoPoint]) -> Self::Layer;

    fn remove_layer(&mut self, layer: Self::Layer);
}

/// Holds at most one live handle per overlay kind.
pub struct Overlays<M: MapSurface> {
    surface: M,
    temporary: Option<M::Layer>,
    start: Option<M::Layer>,
    end: Option<M::Layer>,
    route: Option<M::Layer>,
}

impl<M: MapSurface> Overlays<M> {
    pub fn new(surface: M) -> Self {
        Self {
            surface,
            temporary: None,
            start: None,
            end: None,
            route: None,
        }
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn draw_temporary_marker(&mut self, point: GeoPoint) {
        self.clear_temporary_marker();
        self.temporary = Some(self.surface.add_marker(point, MarkerKind::Temporary));
    }

    pub fn clear_temporary_marker(&mut self) {
        if let Some(layer) = self.temporary.take() {
            self.surface.remove_layer(layer);
        }
    }

    pub fn draw_endpoint_marker(&mut self, point: GeoPoint, role: EndpointRole) {
        self.clear_endpoint_marker(role);
        let layer = self.surface.add_marker(point, role.marker_kind());
        *self.endpoint_slot(role) = Some(layer);
    }

    pub fn clear_endpoint_marker(&mut self, role: EndpointRole) {
        if let Some(layer) = self.endpoint_slot(role).take() {
            self.surface.remove_layer(layer);
        }
    }

    pub fn draw_route(&mut self, points: &[GeoPoint]) {
        self.clear_route();
        self.route = Some(self.surface.add_polyline(points));
    }

    pub fn clear_route(&mut self) {
        if let Some(layer) = self.route.take() {
            self.surface.remove_layer(layer);
        }
    }

    pub fn has_route(&self) -> bool {
        self.route.is_some()
    }

    fn endpoint_slot(&mut self, role: EndpointRole) -> &mut Option<M::Layer> {
        match role {
            EndpointRole::Start => &mut self.start,
            EndpointRole::End => &mut self.end,
        }
    }
}

/// In-memory surface used by the unit tests of this crate.
#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Drawn {
        Marker(GeoPoint, MarkerKind),
        Polyline(Vec<GeoPoint>),
    }

    #[derive(Debug, Default)]
    pub struct RecordingMap {
        next_id: u32,
        pub live: Vec<(u32, Drawn)>,
        pub removed: usize,
        pub polylines_drawn: usize,
    }

    impl RecordingMap {
        pub fn markers(&self, kind: MarkerKind) -> Vec<GeoPoint> {
            self.live
                .iter()
                .filter_map(|(_, drawn)| match drawn {
                    Drawn::Marker(at, k) if *k == kind => Some(*at),
                    _ => None,
                })
                .collect()
        }

        pub fn polylines(&self) -> Vec<Vec<GeoPoint>> {
            self.live
                .iter()
                .filter_map(|(_, drawn)| match drawn {
                    Drawn::Polyline(points) => Some(points.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl MapSurface for RecordingMap {
        type Layer = u32;

        fn add_marker(&mut self, at: GeoPoint, kind: MarkerKind) -> u32 {
            self.next_id += 1;
            self.live.push((self.next_id, Drawn::Marker(at, kind)));
            self.next_id
        }

        fn add_polyline(&mut self, points: &[GeoPoint]) -> u32 {
            self.next_id += 1;
            self.polylines_drawn += 1;
            self.live
                .push((self.next_id, Drawn::Polyline(points.to_vec())));
            self.next_id
        }

        fn remove_layer(&mut self, layer: u32) {
            let before = self.live.len();
            self.live.retain(|(id, _)| *id != layer);
            assert_eq!(before, self.live.len() + 1, "layer {layer} removed twice");
            self.removed += 1;
        }
    }
}
