pub mod collection_request;
pub mod collections_route;
