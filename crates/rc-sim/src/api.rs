//! Request/response boundary.
//!
//! Each handler takes a request, drives the [`Session`] and returns a
//! [`Response`]: `{"success": true, ...payload}` or
//! `{"success": false, "error": "..."}`.  Errors never escape as `Err` or
//! panics; on failure the session state is unchanged.
//!
//! | Endpoint        | Request          | Payload                         |
//! |-----------------|------------------|---------------------------------|
//! | `load_network`  | [`LoadRequest`]  | `center`, `network`             |
//! | `close_road`    | [`CloseRequest`] | `network`, `closure`            |
//! | `reset_network` | none             | `network`                       |

use rc_core::{EdgeKey, GeoPoint, NodeId};
use rc_network::DEFAULT_CENTER;
use rc_output::FeatureCollection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{ClosureSummary, Session, SessionError, SessionResult};

// ── Envelope ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Response<T> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:   Option<String>,
}

impl<T> Response<T> {
    pub fn ok(payload: T) -> Self {
        Self { success: true, payload: Some(payload), error: None }
    }

    pub fn fail(error: impl ToString) -> Self {
        Self { success: false, payload: None, error: Some(error.to_string()) }
    }
}

impl<T> From<SessionResult<T>> for Response<T> {
    fn from(result: SessionResult<T>) -> Self {
        match result {
            Ok(payload) => Response::ok(payload),
            Err(e) => {
                tracing::warn!(error = %e, "request failed");
                Response::fail(e)
            }
        }
    }
}

// ── Requests ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoadRequest {
    pub latitude:  Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CloseRequest {
    pub node_from: u32,
    pub node_to:   u32,
    #[serde(default)]
    pub key:       u32,
}

impl CloseRequest {
    pub fn edge(&self) -> EdgeKey {
        EdgeKey::new(NodeId(self.node_from), NodeId(self.node_to), self.key)
    }
}

// ── Payloads ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoadPayload {
    /// `[latitude, longitude]` of the grid centre.
    pub center:  [f64; 2],
    pub network: FeatureCollection,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClosePayload {
    pub network: FeatureCollection,
    pub closure: ClosureSummary,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NetworkPayload {
    pub network: FeatureCollection,
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// Build a grid around the requested centre (default Jakarta).
pub fn load_network(session: &mut Session, req: &LoadRequest) -> Response<LoadPayload> {
    try_load(session, req).into()
}

pub fn close_road(session: &mut Session, req: &CloseRequest) -> Response<ClosePayload> {
    try_close(session, req).into()
}

pub fn reset_network(session: &mut Session) -> Response<NetworkPayload> {
    try_reset(session).into()
}

fn try_load(session: &mut Session, req: &LoadRequest) -> SessionResult<LoadPayload> {
    let center = GeoPoint::new(
        req.latitude.unwrap_or(DEFAULT_CENTER.lat),
        req.longitude.unwrap_or(DEFAULT_CENTER.lon),
    );
    if !(center.lat.is_finite() && (-90.0..=90.0).contains(&center.lat)) {
        return Err(SessionError::Config(format!("latitude {} out of range", center.lat)));
    }
    if !(center.lon.is_finite() && (-180.0..=180.0).contains(&center.lon)) {
        return Err(SessionError::Config(format!("longitude {} out of range", center.lon)));
    }
    session.load_grid(center)?;
    Ok(LoadPayload { center: [center.lat, center.lon], network: session.features()? })
}

fn try_close(session: &mut Session, req: &CloseRequest) -> SessionResult<ClosePayload> {
    let closure = session.close_road(req.edge())?;
    Ok(ClosePayload { network: session.features()?, closure })
}

fn try_reset(session: &mut Session) -> SessionResult<NetworkPayload> {
    session.reset()?;
    Ok(NetworkPayload { network: session.features()? })
}

// ── JSON dispatch ─────────────────────────────────────────────────────────────

/// Route a raw JSON body to the named endpoint and return the JSON response.
///
/// Malformed bodies and unknown endpoints produce a failure response.
pub fn handle_json(session: &mut Session, endpoint: &str, body: &str) -> String {
    let value = match endpoint {
        "load_network" => parse_body::<LoadRequest>(body)
            .map(|req| to_value(load_network(session, &req)))
            .unwrap_or_else(to_value),
        "close_road" => parse_body::<CloseRequest>(body)
            .map(|req| to_value(close_road(session, &req)))
            .unwrap_or_else(to_value),
        "reset_network" => to_value(reset_network(session)),
        other => to_value(Response::<()>::fail(format!("unknown endpoint '{other}'"))),
    };
    value.to_string()
}

/// An empty body reads as `{}`.
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, Response<()>> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|e| Response::fail(format!("invalid request: {e}")))
}

fn to_value<T: Serialize>(response: Response<T>) -> serde_json::Value {
    serde_json::to_value(&response).unwrap_or_else(|e| {
        serde_json::json!({ "success": false, "error": format!("response encoding failed: {e}") })
    })
}
