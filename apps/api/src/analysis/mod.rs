// Resume Analysis Engine
// Implements: prompt construction, vision extraction with fallback, LLM analysis,
// score / job-title parsing, and the end-to-end pipeline.
// All LLM calls go through llm_client, no direct HTTP calls here.

pub mod client;
pub mod export;
pub mod handlers;
pub mod mode;
pub mod parser;
pub mod pipeline;
pub mod prompts;
