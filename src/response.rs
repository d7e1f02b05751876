//! [`Moderation`] and [`Usage`] results from the [SafeComms moderation API].
//!
//! The service does not promise a fixed response shape, so results are open
//! JSON objects inspected by key rather than a typed schema. Both types
//! deref to the underlying [`serde_json::Map`].
//!
//! [SafeComms moderation API]: <https://api.safecomms.dev>

use derive_more::derive::{Deref, From, IntoIterator};
use serde::{Deserialize, Serialize};

/// Verdict for a moderation call: the decoded JSON object, unvalidated.
///
/// Fields can be read by key (`result["flagged"]`) or iterated. See
/// [`Self::flagged`] for the common case.
#[derive(
    Debug, Clone, Default, Serialize, Deserialize, Deref, From, IntoIterator,
)]
#[cfg_attr(any(feature = "partial-eq", test), derive(PartialEq))]
#[serde(transparent)]
pub struct Moderation(
    #[into_iterator(owned, ref)] serde_json::Map<String, serde_json::Value>,
);

impl Moderation {
    /// Value of the `"flagged"` key, when present and boolean. Returns `None`
    /// for anything else. The raw object is always available for everything
    /// beyond this.
    pub fn flagged(&self) -> Option<bool> {
        self.get("flagged").and_then(serde_json::Value::as_bool)
    }
}

impl std::fmt::Display for Moderation {
    /// The verdict as compact JSON.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Unwrap can never panic because `Map` keys are always strings and
        // `Value` serialization is infallible.
        write!(f, "{}", serde_json::to_string(&self.0).unwrap())
    }
}

/// Account usage figures as returned by the service: the decoded JSON
/// object, unvalidated.
///
/// Fields can be read by key (`usage["requests"]`) or iterated.
#[derive(
    Debug, Clone, Default, Serialize, Deserialize, Deref, From, IntoIterator,
)]
#[cfg_attr(any(feature = "partial-eq", test), derive(PartialEq))]
#[serde(transparent)]
pub struct Usage(
    #[into_iterator(owned, ref)] serde_json::Map<String, serde_json::Value>,
);

impl std::fmt::Display for Usage {
    /// The usage figures as compact JSON.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Unwrap can never panic because `Map` keys are always strings and
        // `Value` serialization is infallible.
        write!(f, "{}", serde_json::to_string(&self.0).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderation_flagged() {
        let verdict: Moderation = serde_json::from_str(
            r#"{"flagged": true, "severity": "high", "categories": ["hate"]}"#,
        )
        .unwrap();

        assert_eq!(verdict.flagged(), Some(true));
        assert_eq!(verdict["severity"], "high");
        assert_eq!(verdict["categories"][0], "hate");
    }

    #[test]
    fn test_moderation_flagged_absent_or_not_bool() {
        let verdict: Moderation = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(verdict.flagged(), None);

        let verdict: Moderation =
            serde_json::from_str(r#"{"flagged": "yes"}"#).unwrap();
        assert_eq!(verdict.flagged(), None);
    }

    #[test]
    fn test_moderation_rejects_non_objects() {
        assert!(serde_json::from_str::<Moderation>("[1, 2]").is_err());
        assert!(serde_json::from_str::<Moderation>("null").is_err());
        assert!(serde_json::from_str::<Moderation>("true").is_err());
    }

    #[test]
    fn test_moderation_display() {
        let verdict: Moderation =
            serde_json::from_str(r#"{"flagged": false, "severity": "none"}"#)
                .unwrap();

        assert_eq!(
            verdict.to_string(),
            r#"{"flagged":false,"severity":"none"}"#
        );
    }

    #[test]
    fn test_moderation_iteration() {
        let verdict: Moderation =
            serde_json::from_str(r#"{"flagged": true}"#).unwrap();

        let keys: Vec<&String> = (&verdict).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["flagged"]);
    }

    #[test]
    fn test_usage() {
        let usage: Usage = serde_json::from_str(
            r#"{"requests": 42, "quota": {"limit": 1000}}"#,
        )
        .unwrap();

        assert_eq!(usage["requests"], 42);
        assert_eq!(usage["quota"]["limit"], 1000);
        assert_eq!(
            usage.to_string(),
            r#"{"quota":{"limit":1000},"requests":42}"#
        );
    }
}
