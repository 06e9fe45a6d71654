//! Library side of the `campinfo` CLI: logging setup and the conversion pipeline.

pub mod logging;
pub mod pipeline;
