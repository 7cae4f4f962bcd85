//! Routes Module
//!
//! HTTP route configuration and router assembly.
//!
//! # Module Structure
//!
//! - **`router`** - the main router creation function
//! - **`api_routes`** - document CRUD routes

pub mod api_routes;
pub mod router;

pub use router::create_router;
