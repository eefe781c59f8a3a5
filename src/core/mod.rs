pub mod binder;
pub mod composer;
pub mod formatter;
pub mod parser;
pub mod pipeline;
pub mod selector;
pub mod style;
