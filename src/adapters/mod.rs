/// Adapters - concrete implementations of the ports
///
/// File-backed sources and report storage, and the LLM service clients.
pub mod services;
pub mod sources;
pub mod storage;
