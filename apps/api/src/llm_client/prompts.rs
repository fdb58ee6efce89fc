// Cross-cutting prompt fragments. Each feature keeps its own prompt builders
// next to the code that calls the model; shared wording lives here.

/// System instruction that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are SmartLeader AI, an assistant for team leads. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to prompts that return identifiers picked from a supplied list.
pub const ID_FIDELITY_INSTRUCTION: &str = "\
    CRITICAL: Any user id you return must be copied exactly from the list provided. \
    Never invent, shorten or reformat an id.";

/// Appended to prompts that talk about people.
pub const TONE_INSTRUCTION: &str = "\
    Be objective, empathetic and focused on the team's well-being. \
    Keep every text field short and concrete.";

/// Wraps a JSON shape description in the standard answer-format section.
pub fn expected_json(shape: &str) -> String {
    format!("# EXPECTED ANSWER (JSON)\nReturn ONLY a valid JSON object in this format:\n{shape}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_json_embeds_shape() {
        let section = expected_json("{\"a\": 1}");
        assert!(section.starts_with("# EXPECTED ANSWER"));
        assert!(section.ends_with("{\"a\": 1}"));
    }
}
