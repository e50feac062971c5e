pub type Result<M> = std::result::Result<M, Error>;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("image is narrower than 2 pixels")]
    ImageTooNarrow,
    #[error("unsupported pixel format")]
    UnsupportedPixelFormat,
    #[error("no label with id {0}")]
    UnknownBlobId(u32),
    #[error("no image has been processed yet")]
    NoImageProcessed,
}
