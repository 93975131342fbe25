//! Shared test doubles and fixtures for the engine integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use timehook_engine::{
    ApiRequest, ApiResponse, ApiSettings, Gateway, RunSettings, Transport, TransportError,
};

pub const WEBHOOK_ID: &str = "9e9480a4-271b-4708-993a-064509457a23";
pub const API_KEY: &str = "api-key";

/// One scripted reply, consumed in order.
pub enum Scripted {
    Response(ApiResponse),
    Failure(TransportError),
}

/// Transport double that replays a fixed script and records every request.
///
/// Running out of script is a test bug, so it panics.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Failure(err)) => Err(err),
            None => panic!("no more responses in the script"),
        }
    }
}

pub fn gateway(transport: &ScriptedTransport) -> Gateway {
    Gateway::new(ApiSettings::new(API_KEY), Arc::new(transport.clone()))
}

pub fn fast_settings() -> RunSettings {
    RunSettings {
        poll_interval: Duration::from_millis(1),
    }
}

pub fn registered_success() -> Scripted {
    Scripted::Response(ApiResponse::new(
        201,
        format!(
            r#"{{
  "_links": {{
    "self": "/webhooks",
    "states": "/states/{WEBHOOK_ID}"
  }},
  "id": "{WEBHOOK_ID}"
}}"#
        ),
    ))
}

pub fn state_registered() -> Scripted {
    state(
        r#""registeredAt": "2018-01-29T12:32:25+0000",
  "scheduledAt": "2018-01-29T12:32:55+0000",
  "status": "registered""#,
    )
}

pub fn state_awaiting() -> Scripted {
    state(
        r#""registeredAt": "2018-01-29T12:32:25+0000",
  "scheduledAt": "2018-01-29T12:32:55+0000",
  "awaitingClockAt": "2018-01-29T12:32:26+0000",
  "status": "awaitingClock""#,
    )
}

pub fn state_sending() -> Scripted {
    state(
        r#""registeredAt": "2018-01-29T12:32:25+0000",
  "scheduledAt": "2018-01-29T12:32:55+0000",
  "awaitingClockAt": "2018-01-29T12:32:26+0000",
  "sendingHttpAt": "2018-01-29T12:32:55+0000",
  "status": "sendingHttp""#,
    )
}

pub fn state_succeeded() -> Scripted {
    state(
        r#""registeredAt": "2018-01-29T12:32:25+0000",
  "scheduledAt": "2018-01-29T12:32:55+0000",
  "awaitingClockAt": "2018-01-29T12:32:26+0000",
  "sendingHttpAt": "2018-01-29T12:32:55+0000",
  "succeededAt": "2018-01-29T12:32:56+0000",
  "status": "succeeded""#,
    )
}

pub fn state_failed() -> Scripted {
    state(
        r#""registeredAt": "2018-01-29T12:32:25+0000",
  "scheduledAt": "2018-01-29T12:32:55+0000",
  "awaitingClockAt": "2018-01-29T12:32:26+0000",
  "sendingHttpAt": "2018-01-29T12:32:55+0000",
  "failedAt": "2018-01-29T12:32:56+0000",
  "status": "failed""#,
    )
}

pub fn unauthorized() -> Scripted {
    Scripted::Response(ApiResponse::new(401, ""))
}

pub fn too_many_requests() -> Scripted {
    Scripted::Response(ApiResponse::new(429, ""))
}

fn state(fields: &str) -> Scripted {
    Scripted::Response(ApiResponse::new(
        200,
        format!("{{\n  \"id\": \"{WEBHOOK_ID}\",\n  {fields}\n}}"),
    ))
}
