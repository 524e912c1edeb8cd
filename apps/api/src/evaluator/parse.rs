//! Verdict parsing. Models are instructed to return bare JSON, but in
//! practice commentary leaks in around it, so the parser isolates the first
//! `{ ... }` span (greedy, spanning newlines) before deserializing.

use serde::Deserialize;

use crate::evaluator::{EvalError, EvaluationOutcome};

/// The JSON object the evaluation prompt asks for.
#[derive(Debug, Deserialize)]
struct Verdict {
    rate: i64,
    details: String,
}

/// Parses an evaluator response into an outcome.
///
/// Fails with `EvalError::Format` when no JSON object is present, the span is
/// malformed, or either field is missing. Scores outside 0–100 in a
/// well-formed response pass through unclamped.
pub fn parse_verdict(text: &str) -> Result<EvaluationOutcome, EvalError> {
    let span = extract_json_span(text)
        .ok_or_else(|| EvalError::Format("no JSON object in response".to_string()))?;

    let verdict: Verdict =
        serde_json::from_str(span).map_err(|e| EvalError::Format(e.to_string()))?;

    let score = i32::try_from(verdict.rate)
        .map_err(|_| EvalError::Format(format!("rate {} out of integer range", verdict.rate)))?;

    Ok(EvaluationOutcome {
        score,
        notes: verdict.details,
    })
}

/// Returns the slice from the first `{` to the last `}`, inclusive.
fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_json_parses() {
        let outcome = parse_verdict(r#"{"rate": 92, "details": "Strong systems background."}"#)
            .unwrap();
        assert_eq!(outcome.score, 92);
        assert_eq!(outcome.notes, "Strong systems background.");
    }

    #[test]
    fn test_surrounding_commentary_is_ignored() {
        let text = "Sure! Here is the evaluation you asked for:\n\n{\"rate\": 55,\n \"details\": \"Mixed profile.\"}\n\nLet me know if you need anything else.";
        let outcome = parse_verdict(text).unwrap();
        assert_eq!(outcome.score, 55);
        assert_eq!(outcome.notes, "Mixed profile.");
    }

    #[test]
    fn test_span_spans_newlines() {
        let text = "{\n  \"rate\": 70,\n  \"details\": \"Meets the bar.\"\n}";
        let outcome = parse_verdict(text).unwrap();
        assert_eq!(outcome.score, 70);
    }

    #[test]
    fn test_no_json_object_is_a_format_error() {
        let err = parse_verdict("I cannot evaluate this candidate.").unwrap_err();
        assert!(matches!(err, EvalError::Format(_)));
    }

    #[test]
    fn test_missing_details_is_a_format_error() {
        let err = parse_verdict(r#"{"rate": 80}"#).unwrap_err();
        assert!(matches!(err, EvalError::Format(_)));
    }

    #[test]
    fn test_missing_rate_is_a_format_error() {
        let err = parse_verdict(r#"{"details": "fine"}"#).unwrap_err();
        assert!(matches!(err, EvalError::Format(_)));
    }

    #[test]
    fn test_non_integer_rate_is_a_format_error() {
        let err = parse_verdict(r#"{"rate": "high", "details": "fine"}"#).unwrap_err();
        assert!(matches!(err, EvalError::Format(_)));
    }

    #[test]
    fn test_malformed_span_is_a_format_error() {
        let err = parse_verdict(r#"{"rate": 80, "details": }"#).unwrap_err();
        assert!(matches!(err, EvalError::Format(_)));
    }

    #[test]
    fn test_out_of_range_rate_passes_through() {
        // No clamping at the parser; the store's check constraint is the
        // only guard at the persistence edge.
        let outcome = parse_verdict(r#"{"rate": 120, "details": "overshoot"}"#).unwrap();
        assert_eq!(outcome.score, 120);
    }

    #[test]
    fn test_boundary_scores_round_trip() {
        for rate in [0, 1, 99, 100] {
            let text = format!("noise before {{\"rate\": {rate}, \"details\": \"d\"}} noise after");
            let outcome = parse_verdict(&text).unwrap();
            assert_eq!(outcome.score, rate);
        }
    }
}
