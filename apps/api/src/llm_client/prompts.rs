// Shared prompt constants used across services.
// Analysis-specific templates live in analysis/prompts.rs.

/// System instruction for every analysis completion.
pub const ANALYST_SYSTEM: &str = "You are an expert resume analyst and career coach. \
    Be brutally honest and provide specific, actionable feedback.";

/// Minimal request used to probe endpoint reachability.
pub const CONNECTION_PROBE: &str = "Say 'Hello' in a creative way.";
