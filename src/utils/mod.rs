pub mod redact;
pub mod shaping;
pub mod suggest;
pub mod text;
pub mod tool_errors;
