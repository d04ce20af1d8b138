// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod gemini_provider;
pub mod json_mapper;
pub mod svg_chart;
