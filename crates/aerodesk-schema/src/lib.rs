//! GraphQL schema definitions for aerodesk.
//!
//! This crate contains the generated schema types for the airline GraphQL API.
//! Separating these into their own crate improves compile times by avoiding
//! recompilation when unrelated code changes.

// Disable all clippy lints for this crate - it's entirely generated code
#![allow(clippy::all)]
#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]

/// Airline GraphQL schema types.
///
/// Generated from `schemas/airline.graphql`; exports the types needed for
/// constructing type-safe queries and mutations against the airline API.
#[cynic::schema("airline")]
pub mod airline {}
