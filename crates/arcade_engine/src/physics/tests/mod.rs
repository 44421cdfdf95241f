//! Cross-module tests for the collision pipeline

mod broad_phase;
