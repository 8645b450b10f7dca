//! Port definitions (interfaces for external systems)
//!
//! Ports define the boundaries between the application and infrastructure
//! layers. Adapters in the infrastructure and presentation layers implement
//! these traits.

pub mod generation_logger;
pub mod llm_gateway;
pub mod progress;
