pub mod ast;
pub mod context;
pub mod expression;
pub mod model;
pub mod types;
