//! Rate-limited client for the ShipStation REST API.
//!
//! The API enforces a per-minute request quota; [`Client`] gates every call on
//! the last quota window reported by the server before dispatching it, and
//! authenticates with HTTP Basic credentials supplied at construction.
//!
//! ```no_run
//! use shipstation_client::{Client, Config, RequestBody};
//!
//! # async fn run() -> Result<(), shipstation_client::Error> {
//! let mut client = Client::new(Config::new("my-key", "my-secret"))?;
//! let orders = client.get("orders?orderStatus=awaiting_shipment").await?;
//! let body = RequestBody::new().string("orderId", "123");
//! let created = client.post("orders/createorder", body).await?;
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod config;
pub mod error;
pub mod http;
pub mod rate;

pub use body::RequestBody;
pub use config::Config;
pub use error::Error;
pub use http::{encode_path_segment, Client, Method};
pub use rate::RateLimit;
