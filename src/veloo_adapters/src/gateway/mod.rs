pub mod http_request_gateway;
pub mod mock_request_gateway;

pub use http_request_gateway::HttpRequestGateway;
pub use mock_request_gateway::MockRequestGateway;
