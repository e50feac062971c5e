pub type Result<M> = std::result::Result<M, Error>;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("point cloud is empty")]
    EmptyPointCloud,
    #[error("point cloud has fewer than 3 points")]
    TooFewPoints,
    #[error("no corner found on the far side of the chosen diagonal")]
    NoCornerFound,
}
