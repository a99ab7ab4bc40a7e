//! Place Recommendation API Library
//!
//! This library provides the core functionality for the place
//! recommendation API: aggregation of nearby places from the external
//! place-search provider, distance enrichment, and AI-assisted
//! recommendation of places and outing courses.
//!
//! # Modules
//!
//! - `aggregation`: Multi-category search, merge, dedup and enrichment.
//! - `ai_client`: Reasoning service (chat completion) client.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `geo`: Distance and walking-time math.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `place_types`: Category label translation.
//! - `places_client`: Place-search provider client.
//! - `recommendation`: Prompt building and model reply parsing.

pub mod aggregation;
pub mod ai_client;
pub mod config;
pub mod errors;
pub mod geo;
pub mod handlers;
pub mod models;
pub mod place_types;
pub mod places_client;
pub mod recommendation;
