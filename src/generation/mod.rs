//! Text and structured output generation.

pub mod object;
pub mod text;

pub use object::{generate_object, GenerateObjectResult};
pub use text::{complete, generate_text, GenerateTextResult};
