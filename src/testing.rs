//! Canned payloads and a scripted generator for unit tests

use crate::analysis::{PerspectiveSet, Synthesis};
use crate::error::TransportError;
use crate::provider::StructuredGenerator;
use crate::schema::SchemaDescriptor;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

fn assessment(recommendation: &str, confidence: i64, metric: (&str, &str)) -> Value {
    json!({
        "recommendation": recommendation,
        "confidence": confidence,
        "reasoning": format!("{} keeps the risk profile manageable.", recommendation),
        "key_points": ["first point", "second point", "third point"],
        "metrics": [{"label": metric.0, "value": metric.1}]
    })
}

pub fn perspectives_json() -> Value {
    json!({
        "security": assessment("Microservices with zero-trust", 8, ("Attack surface", "+15%")),
        "performance": assessment("Microservices", 7, ("p99 latency", "-30ms")),
        "cost": assessment("Budget-conscious incremental path", 9, ("TCO", "$120k/yr")),
        "developer": assessment("Modular monolith first", 6, ("Onboarding", "2 weeks")),
        "business": assessment("Phased migration", 7, ("Time to market", "Q3"))
    })
}

pub fn synthesis_json() -> Value {
    json!({
        "final_recommendation": "Strangler-fig migration to microservices",
        "confidence": 8,
        "reasoning_chain": [
            "Cost carries the highest weight",
            "Security and business both favor isolation",
            "An incremental path satisfies both"
        ],
        "consensus_points": ["The monolith limits scaling"],
        "conflicts_resolved": [
            {"conflict": "Speed vs budget", "resolution": "Extract hot paths first", "tradeoff": "Slower full migration"}
        ],
        "action_plan": ["Extract checkout service", "Add API gateway"],
        "outcomes": {
            "security": "Smaller blast radius",
            "performance": "Checkout latency halves",
            "cost": "Spend stays flat in year one",
            "developer": "Teams own services",
            "business": "Faster feature delivery"
        }
    })
}

pub fn sample_perspectives() -> PerspectiveSet {
    serde_json::from_value(perspectives_json()).expect("valid perspectives fixture")
}

pub fn sample_synthesis() -> Synthesis {
    serde_json::from_value(synthesis_json()).expect("valid synthesis fixture")
}

/// Generator that replays scripted responses in order.
///
/// Once the script runs out, the last response is repeated.
pub struct StubGenerator {
    responses: Mutex<VecDeque<Result<Value, TransportError>>>,
    last: Mutex<Option<Result<Value, TransportError>>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn new(responses: Vec<Result<Value, TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredGenerator for StubGenerator {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(
        &self,
        prompt: &str,
        _schema: &SchemaDescriptor,
    ) -> Result<Value, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        let next = self.responses.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(response) => {
                *last = Some(response.clone());
                response
            }
            None => last
                .clone()
                .unwrap_or_else(|| Err(TransportError::other("stub has no responses"))),
        }
    }
}

/// Write an executable `/bin/sh` script standing in for a CLI backend
#[cfg(unix)]
pub fn fake_cli(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
