pub type Result<M> = std::result::Result<M, Error>;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("frame is missing its 0xAA/0xBB markers")]
    MalformedFrame,
}
