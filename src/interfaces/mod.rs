pub mod handlers;
pub mod notifiers;
pub mod repositories;
pub mod routes;
