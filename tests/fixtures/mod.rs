// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for orion-infrastructure
//!
//! [`FakeSwis`] is an in-memory `Swis` that answers queries from a script
//! and records every call, so tests can assert both the module outcome and
//! exactly which remote verbs a run issued.
//!
//! # Scripting
//! - `on_query(fragment, rows)`: any query whose text contains `fragment`
//!   returns `rows`. Several responses for the same fragment are consumed in
//!   order; the last one repeats.
//! - `on_invoke(verb, value)`: return value of `Invoke/<entity>/<verb>`
//! - `fail_on(verb)`: make a verb (`create`, `update`, `delete` or an invoke
//!   verb name) fail with a remote error

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use orion_infrastructure::client::{Row, Swis};
use orion_infrastructure::errors::{OrionError, OrionResult};
use orion_infrastructure::swql::Query;

/// Fixed timestamp used for node rows
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";

/// One recorded remote call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Query { text: String, parameters: Row },
    Create { entity: String, properties: Row },
    Read { uri: String },
    Update { uri: String, properties: Row },
    Delete { uri: String },
    Invoke { entity: String, verb: String, args: Vec<Value> },
}

impl Call {
    /// Whether the call changes remote state
    pub fn is_corrective(&self) -> bool {
        match self {
            Call::Create { .. } | Call::Update { .. } | Call::Delete { .. } => true,
            Call::Invoke { verb, .. } => !READ_ONLY_VERBS.contains(&verb.as_str()),
            Call::Query { .. } | Call::Read { .. } => false,
        }
    }
}

/// Invoke verbs that only read
pub const READ_ONLY_VERBS: [&str; 5] = [
    "GetAlertSuppressionState",
    "DiscoverInterfacesOnNode",
    "ValidateCredentials",
    "GetAllConnectionProfiles",
    "GetNode",
];

#[derive(Default)]
pub struct FakeSwis {
    queries: Mutex<Vec<(String, VecDeque<Vec<Row>>)>>,
    reads: Mutex<HashMap<String, Row>>,
    invokes: Mutex<HashMap<String, Value>>,
    failures: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeSwis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_query(self, fragment: &str, rows: Vec<Row>) -> Self {
        {
            let mut queries = self.queries.lock().unwrap();
            match queries.iter_mut().find(|(f, _)| f == fragment) {
                Some((_, responses)) => responses.push_back(rows),
                None => queries.push((fragment.to_string(), VecDeque::from([rows]))),
            }
        }
        self
    }

    pub fn on_read(self, uri: &str, row: Row) -> Self {
        self.reads.lock().unwrap().insert(uri.to_string(), row);
        self
    }

    pub fn on_invoke(self, verb: &str, value: Value) -> Self {
        self.invokes.lock().unwrap().insert(verb.to_string(), value);
        self
    }

    pub fn fail_on(self, verb: &str, message: &str) -> Self {
        self.failures.lock().unwrap().insert(verb.to_string(), message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn corrective_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_corrective).collect()
    }

    pub fn query_count(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Query { .. })).count()
    }

    pub fn creates_of(&self, entity: &str) -> Vec<Row> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create { entity: e, properties } if e == entity => Some(properties),
                _ => None,
            })
            .collect()
    }

    pub fn invokes_of(&self, verb: &str) -> Vec<Vec<Value>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Invoke { verb: v, args, .. } if v == verb => Some(args),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failure(&self, verb: &str) -> OrionResult<()> {
        match self.failures.lock().unwrap().get(verb) {
            Some(message) => Err(OrionError::remote(verb, message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Swis for FakeSwis {
    async fn query(&self, query: &Query) -> OrionResult<Vec<Row>> {
        self.record(Call::Query {
            text: query.text().to_string(),
            parameters: query.parameters().clone(),
        });
        self.check_failure("query")?;

        let mut queries = self.queries.lock().unwrap();
        let rows = queries
            .iter_mut()
            .find(|(fragment, _)| query.text().contains(fragment.as_str()))
            .map(|(_, responses)| {
                if responses.len() > 1 {
                    responses.pop_front().unwrap_or_default()
                } else {
                    responses.front().cloned().unwrap_or_default()
                }
            })
            .unwrap_or_default();
        Ok(rows)
    }

    async fn create(&self, entity: &str, properties: &Row) -> OrionResult<String> {
        self.record(Call::Create {
            entity: entity.to_string(),
            properties: properties.clone(),
        });
        self.check_failure("create")?;
        Ok(format!("swis://orion/Orion/{}/ID=1000", entity))
    }

    async fn read(&self, uri: &str) -> OrionResult<Row> {
        self.record(Call::Read { uri: uri.to_string() });
        self.check_failure("read")?;
        Ok(self.reads.lock().unwrap().get(uri).cloned().unwrap_or_default())
    }

    async fn update(&self, uri: &str, properties: &Row) -> OrionResult<()> {
        self.record(Call::Update {
            uri: uri.to_string(),
            properties: properties.clone(),
        });
        self.check_failure("update")
    }

    async fn delete(&self, uri: &str) -> OrionResult<()> {
        self.record(Call::Delete { uri: uri.to_string() });
        self.check_failure("delete")
    }

    async fn invoke(&self, entity: &str, verb: &str, args: Vec<Value>) -> OrionResult<Value> {
        self.record(Call::Invoke {
            entity: entity.to_string(),
            verb: verb.to_string(),
            args,
        });
        self.check_failure(verb)?;
        Ok(self.invokes.lock().unwrap().get(verb).cloned().unwrap_or(Value::Null))
    }
}

/// Convert a JSON object literal into a row
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("row fixture must be an object, got {}", other),
    }
}

/// An `Orion.Nodes` row selecting every column a `Node` needs
pub fn node_row(node_id: i64, caption: &str, ip_address: &str) -> Row {
    row(json!({
        "NodeID": node_id,
        "Caption": caption,
        "Unmanaged": false,
        "UnManageFrom": null,
        "UnManageUntil": null,
        "Uri": format!("swis://orion/Orion/Orion.Nodes/NodeID={}", node_id),
        "ObjectSubType": "ICMP",
        "IP_Address": ip_address,
        "Status": 1,
        "StatusDescription": "Node status is Up.",
        "LastSystemUpTimePollUtc": FIXED_TIMESTAMP,
        "EngineID": 1,
    }))
}

/// Node lookup query fragment
pub const NODE_QUERY: &str = "FROM Orion.Nodes WHERE";

/// A fake with `router1` (NodeID 7, 10.0.0.1) already present
pub fn swis_with_router1() -> FakeSwis {
    FakeSwis::new().on_query(NODE_QUERY, vec![node_row(7, "router1", "10.0.0.1")])
}
