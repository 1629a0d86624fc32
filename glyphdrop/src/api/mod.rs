mod frontend;
mod handlers;
mod routes;
mod state;

pub use frontend::IndexPage;
pub use handlers::convert::ConvertParams;
pub use handlers::health::{HealthData, OcrStatus};
pub use routes::create_router;
pub use state::AppState;
