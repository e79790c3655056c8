pub mod client;
mod record;
mod schema;
