//! Domain layer for the mock-interview service.
//!
//! Holds the interview model, the form schema and controller, the AI reply
//! sanitizer, prompt construction, the collaborator traits (document store,
//! text generator) and the authoring flow that ties them together. Nothing
//! here talks to the network or a database directly.

pub mod authoring;
pub mod error;
pub mod form;
pub mod generator;
pub mod interview;
pub mod prompt;
pub mod sanitizer;
pub mod store;
pub mod types;
