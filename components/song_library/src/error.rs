use file_area::FileAreaError;
use media_downloader::AcquisitionError;
use media_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    FileArea(#[from] FileAreaError),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
