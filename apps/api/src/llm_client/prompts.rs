// Cross-cutting prompt fragments. Each service that calls the model
// defines its full prompt alongside its own code; only the shared
// JSON-discipline text lives here.

/// Output contract appended to every structured prompt. The recovery
/// ladder tolerates violations, but a tight contract keeps them rare.
pub const JSON_ONLY_CONTRACT: &str = "\
CRITICAL OUTPUT CONTRACT:
- Output ONLY one valid JSON object.
- Do NOT add any text before or after the JSON.
- Do NOT add explanations, notes, or headings.
- Stop generating immediately after the final closing brace.";
