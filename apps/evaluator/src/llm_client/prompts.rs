// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "Responde ÚNICAMENTE con un objeto JSON válido. \
    No incluyas texto fuera del objeto JSON. \
    No uses bloques de código markdown. \
    No incluyas explicaciones ni disculpas.";

/// Appends the JSON-only fragment to a system prompt.
pub fn with_json_only(system: &str) -> String {
    format!("{system} {JSON_ONLY_SYSTEM}")
}
