//! Route Query Client: turns map clicks into route queries and settled
//! replies into overlays and status banners.
//!
//! The client never performs I/O. Every operation that needs the routing
//! service returns a [`DispatchedQuery`]; the caller sends it however its
//! platform allows and reports back through
//! [`RouteQueryClient::on_query_settled`]. Only the most recently issued
//! ticket is ever rendered.

use std::fmt;

use tracing::debug;

use crate::selection::Transition;
use crate::{
    ClientState, EndpointRole, GeoPoint, HttpReply, MapSurface, Overlays, QueryError,
    ReselectPolicy, RouteCost, RouteOptions, RouteQuery, RouteResult, SelectionState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryTicket(u64);

impl fmt::Display for QueryTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A query the caller must send; `ticket` identifies its reply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchedQuery {
    pub ticket: QueryTicket,
    pub query: RouteQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBanner {
    InvalidRequest,
    NoPathFound,
    SelectStartAndEnd,
}

impl StatusBanner {
    pub fn message(self) -> &'static str {
        match self {
            StatusBanner::InvalidRequest => "Invalid request",
            StatusBanner::NoPathFound => "No path found",
            StatusBanner::SelectStartAndEnd => "Select a start and an end point",
        }
    }

    /// DOM id of the banner element on the demo page.
    pub fn element_id(self) -> &'static str {
        match self {
            StatusBanner::InvalidRequest => "invalid-request",
            StatusBanner::NoPathFound => "no-path-found",
            StatusBanner::SelectStartAndEnd => "select-start-and-end",
        }
    }
}

pub struct RouteQueryClient<M: MapSurface> {
    state: ClientState,
    policy: ReselectPolicy,
    overlays: Overlays<M>,
    banner: Option<StatusBanner>,
    result: Option<RouteCost>,
    displayed: Option<Vec<GeoPoint>>,
    issued: u64,
    in_flight: Option<QueryTicket>,
}

impl<M: MapSurface> RouteQueryClient<M> {
    pub fn new(surface: M, policy: ReselectPolicy) -> Self {
        Self {
            state: ClientState::default(),
            policy,
            overlays: Overlays::new(surface),
            banner: None,
            result: None,
            displayed: None,
            issued: 0,
            in_flight: None,
        }
    }

    pub fn policy(&self) -> ReselectPolicy {
        self.policy
    }

    pub fn phase(&self) -> SelectionState {
        self.state.phase()
    }

    pub fn start(&self) -> Option<GeoPoint> {
        self.state.start()
    }

    pub fn end(&self) -> Option<GeoPoint> {
        self.state.end()
    }

    pub fn pending(&self) -> Option<GeoPoint> {
        self.state.pending()
    }

    pub fn banner(&self) -> Option<StatusBanner> {
        self.banner
    }

    /// Text of the result panel, if a route with a cost is displayed.
    pub fn result_text(&self) -> Option<String> {
        self.result.as_ref().map(ToString::to_string)
    }

    pub fn displayed_route(&self) -> Option<&[GeoPoint]> {
        self.displayed.as_deref()
    }

    pub fn in_flight(&self) -> Option<QueryTicket> {
        self.in_flight
    }

    pub fn map(&self) -> &M {
        self.overlays.surface()
    }

    pub fn on_map_click(
        &mut self,
        point: GeoPoint,
        options: RouteOptions,
    ) -> Option<DispatchedQuery> {
        let transition = self.state.click(point, self.policy);
        debug!("map click {point:?} -> {transition:?}");

        match transition {
            Transition::StartChosen(point) => {
                self.overlays
                    .draw_endpoint_marker(point, EndpointRole::Start);
                self.reset_route();
                None
            }
            Transition::Restarted(point) => {
                self.overlays
                    .draw_endpoint_marker(point, EndpointRole::Start);
                self.overlays.clear_endpoint_marker(EndpointRole::End);
                self.reset_route();
                None
            }
            Transition::EndChosen(point) => {
                self.overlays.draw_endpoint_marker(point, EndpointRole::End);
                self.reset_route();
                self.requery(options)
            }
            Transition::Staged(point) => {
                self.overlays.draw_temporary_marker(point);
                None
            }
        }
    }

    /// Assigns the staged point to `role` and re-queries.
    pub fn confirm_pending(
        &mut self,
        role: EndpointRole,
        options: RouteOptions,
    ) -> Option<DispatchedQuery> {
        let point = self.state.confirm(role)?;
        debug!("staged point {point:?} confirmed as {role:?}");

        self.overlays.clear_temporary_marker();
        self.overlays.draw_endpoint_marker(point, role);
        self.reset_route();
        self.requery(options)
    }

    pub fn discard_pending(&mut self) {
        if self.state.discard_pending().is_some() {
            self.overlays.clear_temporary_marker();
        }
    }

    /// Builds a query from the current selection, clearing any stale route,
    /// banner and result first. Without both endpoints nothing is sent and
    /// the "select start and end" banner is shown instead.
    pub fn requery(&mut self, options: RouteOptions) -> Option<DispatchedQuery> {
        self.reset_route();

        match self.build_query(options) {
            Ok(query) => {
                self.issued += 1;
                let ticket = QueryTicket(self.issued);
                self.in_flight = Some(ticket);
                debug!(
                    "dispatching query {ticket}: {:?} -> {:?}",
                    query.start, query.end
                );
                Some(DispatchedQuery { ticket, query })
            }
            Err(err) => {
                debug!("query not sent: {err}");
                self.banner = Some(StatusBanner::SelectStartAndEnd);
                None
            }
        }
    }

    pub fn build_query(&self, options: RouteOptions) -> Result<RouteQuery, QueryError> {
        let (start, end) = self
            .state
            .endpoints()
            .ok_or(QueryError::PreconditionNotMet)?;
        Ok(RouteQuery {
            start,
            end,
            options,
        })
    }

    /// Interprets the reply for `ticket`. Replies for anything but the most
    /// recently issued query are dropped and `None` is returned.
    pub fn on_query_settled(
        &mut self,
        ticket: QueryTicket,
        reply: &HttpReply,
    ) -> Option<RouteResult> {
        if self.in_flight != Some(ticket) {
            debug!(
                "dropping reply for superseded query {ticket} (latest: {:?})",
                self.in_flight
            );
            return None;
        }
        self.in_flight = None;

        let result = RouteResult::from_reply(reply);
        self.render(&result);
        Some(result)
    }

    fn render(&mut self, result: &RouteResult) {
        self.clear_feedback();

        match result {
            RouteResult::Found { points, cost } => {
                debug!("drawing route with {} points", points.len());
                self.overlays.draw_route(points);
                self.displayed = Some(points.clone());
                self.result = cost.clone();
            }
            RouteResult::NotFound => self.banner = Some(StatusBanner::NoPathFound),
            RouteResult::RequestInvalid => self.banner = Some(StatusBanner::InvalidRequest),
        }
    }

    /// Clears route, banner and result, and supersedes any in-flight query.
    fn reset_route(&mut self) {
        self.in_flight = None;
        self.clear_feedback();
    }

    fn clear_feedback(&mut self) {
        self.overlays.clear_route();
        self.displayed = None;
        self.banner = None;
        self.result = None;
    }
}
