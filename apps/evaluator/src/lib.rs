pub mod config;
pub mod errors;
pub mod evaluation;
pub mod extraction;
pub mod llm_client;
pub mod models;
pub mod report;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
