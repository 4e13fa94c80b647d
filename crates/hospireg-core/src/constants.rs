//! Wire-level constants shared by the service and the client.

/// Path of the registration upload endpoint.
pub const UPLOAD_PATH: &str = "/upload";

/// Multipart text field carrying the hospital name.
pub const NAME_FIELD: &str = "name";

/// Multipart text field carrying the newline-joined address.
pub const ADDRESS_FIELD: &str = "address";

/// Object-storage folder that receives registration documents.
pub const DEFAULT_UPLOAD_FOLDER: &str = "hospital_uploads";

/// Extensions accepted for document images.
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub const MSG_NAME_AND_ADDRESS_REQUIRED: &str = "Name and address are required";
pub const MSG_NO_FILES_UPLOADED: &str = "No files uploaded";
pub const MSG_UNEXPECTED_FIELD: &str = "Unexpected field";
