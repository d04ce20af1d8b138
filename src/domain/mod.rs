// Domain layer - Core data models, free of I/O
pub mod chart;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod series;
pub mod subject;
