mod leaflet;

use seed::{prelude::*, virtual_dom::AtValue, *};
use serde::Deserialize;
use shared::{
    Criterion, DispatchedQuery, EndpointRole, GeoPoint, HttpReply, QUERY_CONTENT_TYPE,
    QueryTicket, ROUTE_ENDPOINT, RequestEncoding, ReselectPolicy, RouteOptions, RouteQueryClient,
    RouteResult, TravelMode,
};
use wasm_bindgen::{JsCast, prelude::wasm_bindgen};

use crate::leaflet::LeafletMap;

fn api_root() -> String {
    let root = option_env!("ROUTE_SERVICE_URL").unwrap_or("http://localhost:8080/");
    format!("{}/", root.trim_end_matches('/'))
}

fn route_url() -> String {
    format!("{}{ROUTE_ENDPOINT}", api_root())
}

fn reselect_policy() -> ReselectPolicy {
    option_env!("ROUTE_RESELECT_POLICY")
        .and_then(ReselectPolicy::from_config)
        .unwrap_or_default()
}

fn request_encoding() -> RequestEncoding {
    option_env!("ROUTE_REQUEST_ENCODING")
        .and_then(RequestEncoding::from_config)
        .unwrap_or_default()
}

pub struct Model {
    client: RouteQueryClient<LeafletMap>,
    travel_mode: TravelMode,
    criterion: Criterion,
}

impl Model {
    /// UI options are read at query time only.
    fn options(&self) -> RouteOptions {
        RouteOptions::new(self.travel_mode, self.criterion)
    }
}

pub enum Msg {
    MapClicked { lat: f64, lon: f64 },
    TravelModeChanged(String),
    CriterionChanged(String),
    ConfirmPending(EndpointRole),
    DiscardPending,
    Requery,
    QuerySettled { ticket: QueryTicket, reply: HttpReply },
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.stream(streams::window_event(Ev::from("map-click"), |event| {
        let event = event.dyn_into::<web_sys::CustomEvent>().ok()?;
        let payload: MapClickPayload = serde_wasm_bindgen::from_value(event.detail()).ok()?;
        Some(Msg::MapClicked {
            lat: payload.lat,
            lon: payload.lon,
        })
    }));

    Model {
        client: RouteQueryClient::new(LeafletMap, reselect_policy()),
        travel_mode: TravelMode::default(),
        criterion: Criterion::default(),
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    let options = model.options();
    let dispatched = match msg {
        Msg::MapClicked { lat, lon } => {
            web_sys::console::debug_1(
                &format!(
                    "[frontend] map click phase={:?} lat={lat:.5} lon={lon:.5}",
                    model.client.phase()
                )
                .into(),
            );
            model.client.on_map_click(GeoPoint::new(lat, lon), options)
        }
        Msg::TravelModeChanged(value) => {
            model.travel_mode = TravelMode::from_control(&value);
            None
        }
        Msg::CriterionChanged(value) => {
            model.criterion = Criterion::from_control(&value);
            None
        }
        Msg::ConfirmPending(role) => model.client.confirm_pending(role, options),
        Msg::DiscardPending => {
            model.client.discard_pending();
            None
        }
        Msg::Requery => model.client.requery(options),
        Msg::QuerySettled { ticket, reply } => {
            match model.client.on_query_settled(ticket, &reply) {
                Some(RouteResult::Found { points, .. }) => web_sys::console::debug_1(
                    &format!("[frontend] query {ticket} found {} points", points.len()).into(),
                ),
                Some(other) => web_sys::console::debug_1(
                    &format!("[frontend] query {ticket} settled as {other:?}").into(),
                ),
                None => web_sys::console::debug_1(
                    &format!("[frontend] query {ticket} superseded, reply dropped").into(),
                ),
            }
            None
        }
    };

    if let Some(dispatched) = dispatched {
        orders.perform_cmd(send_route_query(dispatched));
    }
}

/// Sends one query on a freshly built request and reports its reply.
async fn send_route_query(dispatched: DispatchedQuery) -> Msg {
    let DispatchedQuery { ticket, query } = dispatched;
    web_sys::console::debug_1(
        &format!(
            "[frontend] sending query {ticket} start=({:.5},{:.5}) end=({:.5},{:.5})",
            query.start.latitude, query.start.longitude, query.end.latitude, query.end.longitude
        )
        .into(),
    );

    let reply = match query.to_body(request_encoding()) {
        Err(err) => HttpReply::TransportFailed(err.to_string()),
        Ok(body) => post_body(body).await,
    };

    Msg::QuerySettled { ticket, reply }
}

async fn post_body(body: String) -> HttpReply {
    let request = Request::new(route_url())
        .method(Method::Post)
        .text(body)
        .header(Header::custom("Content-Type", QUERY_CONTENT_TYPE));

    match request.fetch().await {
        Err(err) => HttpReply::TransportFailed(format!("{err:?}")),
        Ok(response) => {
            let status = response.status().code;
            match response.text().await {
                Ok(body) => HttpReply::Completed { status, body },
                Err(err) => HttpReply::TransportFailed(format!("{err:?}")),
            }
        }
    }
}

pub fn view(model: &Model) -> Node<Msg> {
    div![
        C!["app-container"],
        h1!["Route planner"],
        view_controls(model),
        view_selection(model),
        view_status(model),
    ]
}

fn view_controls(model: &Model) -> Node<Msg> {
    let choice = |value: &str, label: &str, selected: bool| {
        option![
            attrs! {
                At::Value => value,
                At::Selected => bool_attr(selected),
            },
            label
        ]
    };

    form![
        C!["controls"],
        fieldset![
            legend!["Options"],
            label!["Travel mode"],
            select![
                attrs! { At::Id => "travel-mode" },
                choice(
                    TravelMode::Car.as_control(),
                    "Car",
                    model.travel_mode == TravelMode::Car
                ),
                choice(
                    TravelMode::Foot.as_control(),
                    "Foot",
                    model.travel_mode == TravelMode::Foot
                ),
                input_ev(Ev::Change, Msg::TravelModeChanged),
            ],
            label!["Optimize by"],
            select![
                attrs! { At::Id => "criterion" },
                choice(
                    Criterion::Time.as_control(),
                    "Time",
                    model.criterion == Criterion::Time
                ),
                choice(
                    Criterion::Distance.as_control(),
                    "Distance",
                    model.criterion == Criterion::Distance
                ),
                input_ev(Ev::Change, Msg::CriterionChanged),
            ],
        ],
        button![
            "Route",
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::Requery
            }),
            attrs! { At::Disabled => bool_attr(model.client.in_flight().is_some()) },
        ],
    ]
}

fn view_selection(model: &Model) -> Node<Msg> {
    let card = |label: &str, point: Option<GeoPoint>| {
        div![
            C!["metadata-card"],
            span![C!["label"], label],
            strong![point.map(format_point).unwrap_or_else(|| "-".to_string())],
        ]
    };

    let pending = match model.client.pending() {
        Some(point) => div![
            C!["pending"],
            span![format!("Selected {}", format_point(point))],
            button![
                C!["set-point", "set-start"],
                "Set as start",
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::ConfirmPending(EndpointRole::Start)
                }),
            ],
            button![
                C!["set-point", "set-end"],
                "Set as end",
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::ConfirmPending(EndpointRole::End)
                }),
            ],
            button![
                C!["set-point"],
                "Discard",
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::DiscardPending
                }),
            ],
        ],
        None => empty![],
    };

    div![
        C!["metadata-grid"],
        card("Start", model.client.start()),
        card("End", model.client.end()),
        pending,
    ]
}

fn view_status(model: &Model) -> Node<Msg> {
    let banner = match model.client.banner() {
        Some(banner) => p![
            C!["status", "error"],
            attrs! { At::Id => banner.element_id() },
            banner.message()
        ],
        None => empty![],
    };

    let result = match model.client.result_text() {
        Some(text) => div![C!["result"], attrs! { At::Id => "result" }, text],
        None => empty![],
    };

    div![C!["preview"], banner, result]
}

#[wasm_bindgen(start)]
pub fn start() {
    leaflet::init_map();
    App::start("app", init, update, view);
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}

fn format_point(point: GeoPoint) -> String {
    format!("{:.5} / {:.5}", point.latitude, point.longitude)
}

#[derive(Deserialize)]
struct MapClickPayload {
    lat: f64,
    lon: f64,
}
