//! Google Sheets API access
//!
//! [`SheetService`] implements [`ValueSource`](crate::source::ValueSource)
//! over the Sheets v4 `values.get` and `values.batchGet` endpoints, authorized
//! with a service account.
//!
//! Credentials are usually taken from the environment:
//!
//! - `GOOGLE_APPLICATION_CREDENTIALS`: path to a service account key file
//! - `GOOGLE_APPLICATION_CREDENTIALS_BASE64_JSON`: the key JSON, base64-encoded
//!
//! ```no_run
//! use gsheets::sheets::SheetService;
//! use gsheets::source::ValueSource;
//!
//! # async fn example() -> gsheets::Result<()> {
//! let service = SheetService::from_env("my-spreadsheet-id")?;
//! let ranges = vec![
//!     service.sheet_range("Orders", "A:F"),
//!     service.sheet_range("Customers", "A:C"),
//! ];
//! let grids = service.batch_get(&ranges).await?;
//! assert_eq!(grids.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod credentials;

pub use client::{SheetService, SheetServiceBuilder, DEFAULT_ENDPOINT};
pub use credentials::{Credentials, ServiceAccount};
