pub mod coaching;
pub mod generation;
pub mod ingest;
pub mod llm;
