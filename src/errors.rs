use thiserror::Error;

/// Represents errors that can occur while turning a lesson into deck or worksheet artifacts.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The lesson object is missing data that rendering cannot proceed without
    /// (e.g. an empty `slides` array). Raised before any page is built.
    #[error("Invalid lesson content: {0}")]
    InvalidLesson(String),

    /// Error occurred during the deserialization of lesson or image-map JSON.
    #[error("Failed to deserialize JSON input: {0}")]
    JsonDeserialization(#[from] serde_json::Error),

    /// Error raised by the zip archive writer while assembling an OOXML package.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error raised while serializing one of the XML parts of a package.
    #[error("Failed to write package part: {0}")]
    Package(String),

    /// Error while formatting text output (SVG, markdown).
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Error originating from the underlying HTTP client (`reqwest`).
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// A remote image answered with a non-success status.
    #[error("Image fetch failed: Status {status} for {url}")]
    ImageFetch { status: u16, url: String },

    /// An image could not be read, decoded or re-encoded for embedding.
    #[error("Image error: {0}")]
    Image(String),

    /// An error indicating invalid input was provided to a public function.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An I/O error occurred, usually while writing the final artifact.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A type alias for `Result<T, RenderError>` for convenience within the crate.
pub type Result<T> = std::result::Result<T, RenderError>;
