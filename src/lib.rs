pub mod config;
pub mod feed;
pub mod gemini;
pub mod linkedin;
pub mod pipeline;
pub mod render;
