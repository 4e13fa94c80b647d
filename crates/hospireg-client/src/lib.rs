//! Hospital registration form client.
//!
//! Holds the form state (name, three address lines, one image per document kind), validates
//! it, packages it as the multipart body `POST /upload` expects and reports the outcome to a
//! UI host through alerts and a "navigate to dashboard" signal. The picker, the UI host and
//! the HTTP transport are traits so a mobile shell, the CLI and tests can each supply their own.

pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod host;
pub mod transport;

pub use config::ClientConfig;
pub use controller::RegistrationController;
pub use error::{SelectionError, SubmitError, TransportError, ValidationError};
pub use form::{FilePart, Platform, RegistrationForm, SelectedFile, SubmissionPayload};
pub use host::{FilePicker, PickedImage, UiHost};
pub use transport::{HttpTransport, SubmitReceipt, Transport};
