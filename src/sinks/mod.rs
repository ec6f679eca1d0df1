//! Provided sink implementations

pub mod json;
pub mod text;

pub use json::{JsonSink, JsonSinkOptions};
pub use text::{
    default_primary_colour, default_secondary_colour, default_severity_colours, ColourMode,
    TextSink, TextSinkOptions,
};
