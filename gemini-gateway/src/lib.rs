//! HTTP gateway relaying text, image, document and audio prompts to Gemini.
pub mod config;
pub mod handlers;
pub mod services;
pub mod startup;
