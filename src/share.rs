//! Share links: a scenario's inputs packed into a URL query string
//!
//! `p` carries the problem, `c` the context and `w` the weights as JSON.

use crate::analysis::PriorityWeights;
use serde::Serialize;
use url::{form_urlencoded, Url};

/// Inputs recovered from a share link. Absent or invalid fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SharedScenario {
    pub problem: Option<String>,
    pub context: Option<String>,
    pub weights: Option<PriorityWeights>,
}

/// Build the query string (no leading `?`), keys always in `p`, `c`, `w` order
pub fn encode(
    problem: &str,
    context: &str,
    weights: &PriorityWeights,
) -> Result<String, serde_json::Error> {
    let weights_json = serde_json::to_string(weights)?;
    Ok(form_urlencoded::Serializer::new(String::new())
        .append_pair("p", problem)
        .append_pair("c", context)
        .append_pair("w", &weights_json)
        .finish())
}

/// Append the encoded query to `base`, replacing any query it already has
pub fn link(
    base: &Url,
    problem: &str,
    context: &str,
    weights: &PriorityWeights,
) -> Result<Url, serde_json::Error> {
    let mut url = base.clone();
    url.set_query(Some(&encode(problem, context, weights)?));
    Ok(url)
}

/// Parse a full URL or a bare query string. Never fails.
pub fn decode(link: &str) -> SharedScenario {
    let link = link.trim();
    let query = match Url::parse(link) {
        Ok(url) => url.query().unwrap_or_default().to_string(),
        Err(_) => {
            let without_fragment = link.split('#').next().unwrap_or_default();
            match without_fragment.split_once('?') {
                Some((_, query)) => query.to_string(),
                None => without_fragment.to_string(),
            }
        }
    };

    let mut shared = SharedScenario::default();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "p" if !value.is_empty() => shared.problem = Some(value.into_owned()),
            "c" if !value.is_empty() => shared.context = Some(value.into_owned()),
            "w" => {
                shared.weights = serde_json::from_str::<PriorityWeights>(&value)
                    .ok()
                    .filter(|w| w.validate().is_ok());
            }
            _ => {}
        }
    }
    shared
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let weights = PriorityWeights {
            security: 80,
            performance: 60,
            cost: 100,
            developer: 40,
            business: 70,
        };
        let query = encode("Should we migrate?", "Legacy system", &weights).unwrap();
        assert!(query.starts_with("p=Should+we+migrate%3F&c=Legacy+system&w="));

        let shared = decode(&query);
        assert_eq!(shared.problem.as_deref(), Some("Should we migrate?"));
        assert_eq!(shared.context.as_deref(), Some("Legacy system"));
        assert_eq!(shared.weights, Some(weights));
    }

    #[test]
    fn test_decode_full_url() {
        let base = Url::parse("https://parthought.example/app#top").unwrap();
        let url = link(&base, "Rewrite in Rust?", "", &PriorityWeights::default()).unwrap();

        let shared = decode(url.as_str());
        assert_eq!(shared.problem.as_deref(), Some("Rewrite in Rust?"));
        assert_eq!(shared.context, None);
        assert_eq!(shared.weights, Some(PriorityWeights::default()));
    }

    #[test]
    fn test_invalid_weights_are_ignored() {
        let shared = decode("?p=x&w=%7Bnot-json");
        assert_eq!(shared.problem.as_deref(), Some("x"));
        assert_eq!(shared.weights, None);

        let shared = decode(
            r#"w={"security":250,"performance":1,"cost":1,"developer":1,"business":1}"#,
        );
        assert_eq!(shared.weights, None);
    }

    #[test]
    fn test_garbage_yields_nothing() {
        assert_eq!(decode("not a link at all"), SharedScenario::default());
        assert_eq!(decode(""), SharedScenario::default());
    }
}
