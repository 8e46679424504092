pub mod document_request;
pub mod documents_route;
