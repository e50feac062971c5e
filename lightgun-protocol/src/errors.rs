pub type Result<M> = std::result::Result<M, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("already connected")]
    AlreadyConnected,
    #[error("device not responding")]
    DeviceNotResponding,
    #[error("invalid authentication")]
    InvalidAuthentication,
    #[error("{0}")]
    Serial(#[from] lightgun_serial::Error),
}
