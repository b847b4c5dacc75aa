//! Minimal client for the CKAN action api behind Toronto's open data portal.

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use std::time::Duration;

pub type RawRecord = Map<String, Value>;

const TIMEOUT_SECS: u64 = 60;

#[derive(Deserialize, Debug)]
struct ActionResponse {
    success: bool,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Deserialize, Debug, Default)]
pub struct DatastorePage {
    #[serde(default)]
    pub records: Vec<RawRecord>,
    #[serde(default)]
    pub total: Option<u64>,
}

pub struct CkanClient {
    base_url: String,
    agent: ureq::Agent,
}

impl CkanClient {
    pub fn new(base_url: &str) -> CkanClient {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build();
        CkanClient {
            base_url: String::from(base_url.trim_end_matches('/')),
            agent,
        }
    }

    pub fn action_url(&self, action: &str) -> String {
        format!("{}/api/3/action/{}", self.base_url, action)
    }

    fn call_action(&self, action: &str, params: &[(&str, &str)]) -> Result<Value> {
        let mut req = self.agent.get(&self.action_url(action));
        for (k, v) in params {
            req = req.query(k, v);
        }
        let response: ActionResponse = match req.call() {
            Ok(resp) => resp.into_json()?,
            Err(e) => return Err(action_error(action, e)),
        };
        check_response(action, response)
    }

    /// Full metadata of one package, as returned by `package_show`.
    pub fn package_show(&self, package_id: &str) -> Result<Value> {
        self.call_action("package_show", &[("id", package_id)])
    }

    pub fn package_search(&self, query: &str, rows: usize) -> Result<Value> {
        let rows = rows.to_string();
        self.call_action("package_search", &[("q", query), ("rows", &rows)])
    }

    pub fn datastore_search(&self, resource_id: &str, limit: usize, offset: usize) -> Result<DatastorePage> {
        let limit = limit.to_string();
        let offset = offset.to_string();
        let result = self.call_action(
            "datastore_search",
            &[("id", resource_id), ("limit", &limit), ("offset", &offset)],
        )?;
        Ok(serde_json::from_value(result)?)
    }
}

fn check_response(action: &str, response: ActionResponse) -> Result<Value> {
    if response.success {
        return Ok(response.result);
    }
    let msg = match response.error {
        Some(e) => e.to_string(),
        None => String::from("no error message"),
    };
    Err(Error::CkanError(format!("{}: {}", action, msg)))
}

/// CKAN reports failures with a non-2xx status and a `success: false` json
/// body. Any other error response is kept as the http error.
fn action_error(action: &str, err: ureq::Error) -> Error {
    match err {
        ureq::Error::Status(code, resp) if resp.content_type() == "application/json" => {
            let url = String::from(resp.get_url());
            match resp.into_json::<ActionResponse>() {
                Ok(body) if !body.success => match check_response(action, body) {
                    Err(e) => e,
                    Ok(_) => Error::CkanError(format!("{}: status code {}", action, code)),
                },
                _ => Error::CkanError(format!("{}: {}: status code {}", action, url, code)),
            }
        }
        other => Error::from(other),
    }
}

/// The resources listed in a package, or an empty slice.
pub fn package_resources(package: &Value) -> &[Value] {
    match package.get("resources").and_then(Value::as_array) {
        Some(r) => r,
        None => &[],
    }
}

/// Id of the first resource which has been loaded into the datastore.
pub fn active_resource_id(package: &Value) -> Option<String> {
    package_resources(package)
        .iter()
        .find(|r| r.get("datastore_active").and_then(Value::as_bool).unwrap_or(false))
        .and_then(|r| r.get("id"))
        .and_then(Value::as_str)
        .map(String::from)
}
