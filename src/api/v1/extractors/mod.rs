mod auth_ctx;
mod query_params;
mod validated_json;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use query_params::QueryParams;
pub use validated_json::ValidatedJson;
