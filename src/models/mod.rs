//! API data models
//!
//! This module contains the guidance request/answer shapes and the OpenAI
//! chat-completion payload.

pub mod guidance;
pub mod openai;
