use crate::{EndpointRole, GeoPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    StartChosen,
    BothChosen,
}

/// What a click does once both endpoints are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReselectPolicy {
    /// The click becomes the new start and the end is discarded.
    #[default]
    Restart,
    /// The click is staged on a temporary marker until the user assigns it
    /// to the start or the end.
    Confirm,
}

impl ReselectPolicy {
    pub fn from_config(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "restart" => Some(ReselectPolicy::Restart),
            "confirm" | "staged" => Some(ReselectPolicy::Confirm),
            _ => None,
        }
    }
}

/// Outcome of feeding one click into [`ClientState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    StartChosen(GeoPoint),
    EndChosen(GeoPoint),
    /// New start chosen from `BothChosen`; the previous end is gone.
    Restarted(GeoPoint),
    Staged(GeoPoint),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    start: Option<GeoPoint>,
    end: Option<GeoPoint>,
    pending: Option<GeoPoint>,
}

impl ClientState {
    pub fn phase(&self) -> SelectionState {
        match (self.start, self.end) {
            (Some(_), Some(_)) => SelectionState::BothChosen,
            (Some(_), None) => SelectionState::StartChosen,
            (None, _) => SelectionState::Empty,
        }
    }

    pub fn start(&self) -> Option<GeoPoint> {
        self.start
    }

    pub fn end(&self) -> Option<GeoPoint> {
        self.end
    }

    pub fn pending(&self) -> Option<GeoPoint> {
        self.pending
    }

    pub fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        self.start.zip(self.end)
    }

    pub fn click(&mut self, point: GeoPoint, policy: ReselectPolicy) -> Transition {
        match (self.phase(), policy) {
            (SelectionState::Empty, _) => {
                self.start = Some(point);
                Transition::StartChosen(point)
            }
            (SelectionState::StartChosen, _) => {
                self.end = Some(point);
                Transition::EndChosen(point)
            }
            (SelectionState::BothChosen, ReselectPolicy::Restart) => {
                self.start = Some(point);
                self.end = None;
                Transition::Restarted(point)
            }
            (SelectionState::BothChosen, ReselectPolicy::Confirm) => {
                self.pending = Some(point);
                Transition::Staged(point)
            }
        }
    }

    /// Moves the staged point into `role`. Returns the point, or `None` when
    /// nothing is staged.
    pub fn confirm(&mut self, role: EndpointRole) -> Option<GeoPoint> {
        let point = self.pending.take()?;
        match role {
            EndpointRole::Start => self.start = Some(point),
            EndpointRole::End => self.end = Some(point),
        }
        Some(point)
    }

    pub fn discard_pending(&mut self) -> Option<GeoPoint> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: GeoPoint = GeoPoint {
        latitude: 51.0,
        longitude: 10.0,
    };
    const B: GeoPoint = GeoPoint {
        latitude: 52.0,
        longitude: 11.0,
    };
    const C: GeoPoint = GeoPoint {
        latitude: 53.0,
        longitude: 12.0,
    };

    #[test]
    fn clicks_fill_start_then_end() {
        let mut state = ClientState::default();
        assert_eq!(state.phase(), SelectionState::Empty);

        assert_eq!(state.click(A, ReselectPolicy::Restart), Transition::StartChosen(A));
        assert_eq!(state.phase(), SelectionState::StartChosen);

        assert_eq!(state.click(B, ReselectPolicy::Restart), Transition::EndChosen(B));
        assert_eq!(state.endpoints(), Some((A, B)));
    }

    #[test]
    fn restart_policy_discards_end() {
        let mut state = ClientState::default();
        state.click(A, ReselectPolicy::Restart);
        state.click(B, ReselectPolicy::Restart);

        assert_eq!(state.click(C, ReselectPolicy::Restart), Transition::Restarted(C));
        assert_eq!(state.phase(), SelectionState::StartChosen);
        assert_eq!(state.start(), Some(C));
        assert_eq!(state.end(), None);
    }

    #[test]
    fn confirm_policy_stages_until_assigned() {
        let mut state = ClientState::default();
        state.click(A, ReselectPolicy::Confirm);
        state.click(B, ReselectPolicy::Confirm);

        assert_eq!(state.click(C, ReselectPolicy::Confirm), Transition::Staged(C));
        assert_eq!(state.endpoints(), Some((A, B)));
        assert_eq!(state.pending(), Some(C));

        assert_eq!(state.confirm(EndpointRole::Start), Some(C));
        assert_eq!(state.endpoints(), Some((C, B)));
        assert_eq!(state.pending(), None);
        assert_eq!(state.confirm(EndpointRole::End), None);
    }

    #[test]
    fn policy_from_config() {
        assert_eq!(ReselectPolicy::from_config("Confirm"), Some(ReselectPolicy::Confirm));
        assert_eq!(ReselectPolicy::from_config(" restart"), Some(ReselectPolicy::Restart));
        assert_eq!(ReselectPolicy::from_config("both"), None);
    }
}
