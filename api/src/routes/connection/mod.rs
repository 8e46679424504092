pub mod connection_request;
pub mod connection_route;
