/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints.
/// Each handler is responsible for processing a specific type of HTTP request,
/// checking what the authenticated caller may do, calling the appropriate
/// repository functions, and returning a properly formatted response.

mod auth_handlers;
mod collection_handlers;
mod relation_handlers;
mod flash_card_handlers;

// Re-export all handlers
pub use auth_handlers::*;
pub use collection_handlers::*;
pub use relation_handlers::*;
pub use flash_card_handlers::*;
