//! Storyboard Engine — scene decomposition into image-generation prompts.
//!
//! Turns a prose comic-book scene, a table of canonical character
//! descriptors, and a global style guide into an ordered sequence of
//! self-contained, structured prompts for an external image-generation
//! service. The pipeline is a pure function of its inputs: identical
//! inputs always yield bit-identical output.

pub mod core;
pub mod schema;
