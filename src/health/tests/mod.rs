//! Unit tests for the health module.
