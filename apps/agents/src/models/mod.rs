// Data models for the agent core.
// `profile` is the read-only master-data surface; `context` carries execution
// inputs; `response` is the uniform result envelope.

pub mod context;
pub mod profile;
pub mod response;
