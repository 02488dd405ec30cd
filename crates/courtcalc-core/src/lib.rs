// Library root: the formula language, the evaluation engine, and the
// storage and configuration layers the HTTP server is built on.

pub mod config;
pub mod db;
pub mod engine;
pub mod examples;
pub mod formula;
pub mod naming;
pub mod player;
pub mod stat;
pub mod store;
pub mod validate;

pub use engine::{EvaluationConfig, ResultRow, StatEngine};
pub use formula::{Formula, FormulaError};
pub use player::PlayerRecord;
pub use stat::Stat;
