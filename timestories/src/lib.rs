//! Fetch a news homepage, pick out the latest story links and serve them as
//! JSON.

pub mod extract;
pub mod fetch;
pub mod model;
pub mod server;
pub mod stories;
