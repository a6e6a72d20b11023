// HTTP front end
pub mod protocol;
pub mod routes;
pub mod server;

pub use protocol::{HistoryResponse, ReceiveResponse, SendRequest, SendResponse};
pub use routes::{create_router, AppState};
pub use server::{WebServer, WebServerConfig};
