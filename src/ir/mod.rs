pub mod expr;
pub mod options;
pub mod pipeline;
pub mod transforms;
pub mod visitor;
