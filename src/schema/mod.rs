pub mod character;
pub mod moment;
pub mod prompt;
pub mod scene;
pub mod style;
