//! API data models
//!
//! This module contains data structures for the OpenAI Responses API.

pub mod openai;
