//! Adapter implementations for service directory ports.

pub mod memory;

pub use memory::InMemoryServiceRepository;
