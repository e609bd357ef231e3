pub mod bulk_client;
pub mod run_client;

pub use bulk_client::BulkClient;
pub use run_client::RunClient;
