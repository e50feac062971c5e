pub type Result<M> = std::result::Result<M, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to open serial port: {0}")]
    Open(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
