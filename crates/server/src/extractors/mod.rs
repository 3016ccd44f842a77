//! Request extractors that reject with the JSON error envelope.

mod json_body;
mod validated_json;

pub use json_body::JsonBody;
pub use validated_json::ValidatedJson;
