use crate::base::address::BusAddress;
use crate::drivers::sunricher::CommandTransport;
use crate::request::{DirectCommand, RequestError};
use crate::switch::{Action, Direction, SwitchController};
use hyper::http::StatusCode;
use log::{error, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Response before it is turned into a hyper response
#[derive(Debug, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn ok(body: String) -> Reply {
        Reply {
            status: StatusCode::OK,
            content_type: "text/plain",
            body,
        }
    }

    fn json(body: String) -> Reply {
        Reply {
            status: StatusCode::OK,
            content_type: "application/json",
            body,
        }
    }

    fn error(status: StatusCode, msg: impl ToString) -> Reply {
        Reply {
            status,
            content_type: "text/plain",
            body: msg.to_string(),
        }
    }
}

impl From<RequestError> for Reply {
    fn from(err: RequestError) -> Reply {
        if err.is_not_found() {
            Reply::error(StatusCode::NOT_FOUND, err)
        } else if err.is_validation() {
            Reply::error(StatusCode::BAD_REQUEST, err)
        } else {
            error!("Failed to send DALI command: {}", err);
            Reply::error(StatusCode::INTERNAL_SERVER_ERROR, err)
        }
    }
}

/// Query parameters, keys in lower case
fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    match query {
        Some(q) => form_urlencoded::parse(q.as_bytes())
            .map(|(k, v)| (k.to_ascii_lowercase(), v.into_owned()))
            .collect(),
        None => HashMap::new(),
    }
}

fn parse_switch_event(
    address: &str,
    action: &str,
    dir: &str,
) -> Result<(BusAddress, Action, Direction), RequestError> {
    Ok((address.parse()?, action.parse()?, dir.parse()?))
}

/// Handles the `/DaliCommand` routes.
pub struct DaliApi {
    switch: SwitchController,
    transport: Arc<CommandTransport>,
}

impl DaliApi {
    pub fn new(switch: SwitchController, transport: Arc<CommandTransport>) -> DaliApi {
        DaliApi { switch, transport }
    }

    pub async fn handle(&self, path: &str, query: Option<&str>) -> Reply {
        let query = parse_query(query);
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        match parts.as_slice() {
            [root, rest @ ..] if root.eq_ignore_ascii_case("DaliCommand") => match rest {
                [kind, address] if kind.eq_ignore_ascii_case("Switch") => {
                    self.switch_event(address, &query).await
                }
                [kind, address] if kind.eq_ignore_ascii_case("State") => {
                    self.channel_state(address).await
                }
                [address] => self.send_command(address, &query).await,
                _ => Reply::error(StatusCode::NOT_FOUND, "Unknown command"),
            },
            _ => Reply::error(StatusCode::NOT_FOUND, "Not found"),
        }
    }

    async fn send_command(&self, address: &str, query: &HashMap<String, String>) -> Reply {
        let cmd = match DirectCommand::parse(
            address,
            query.get("command").map(|s| s.as_str()),
            query.get("value").map(|s| s.as_str()),
        ) {
            Ok(cmd) => cmd,
            Err(e) => return e.into(),
        };
        match cmd.send(&self.transport).await {
            Ok(()) => Reply::ok(String::new()),
            Err(e) => e.into(),
        }
    }

    async fn switch_event(&self, address: &str, query: &HashMap<String, String>) -> Reply {
        let action = query.get("action").map_or("", |s| s.as_str());
        let dir = query.get("direction").map_or("", |s| s.as_str());
        match parse_switch_event(address, action, dir) {
            Ok((address, action, dir)) => {
                let status = self.switch.handle_event(address, action, dir).await;
                Reply::ok(status.to_string())
            }
            Err(e) => {
                warn!("Bad switch request: {}", e);
                e.into()
            }
        }
    }

    async fn channel_state(&self, address: &str) -> Reply {
        let address = match address.parse::<BusAddress>() {
            Ok(a) => a,
            Err(e) => return RequestError::from(e).into(),
        };
        let Some(state) = self.switch.channel_state(address).await else {
            return Reply::error(StatusCode::NOT_FOUND, "No state for channel");
        };
        let doc = serde_json::json!({
            "address": address.to_string(),
            "state": state,
        });
        Reply::json(doc.to_string())
    }
}
