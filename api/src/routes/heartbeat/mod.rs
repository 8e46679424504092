pub mod heartbeat_route;
