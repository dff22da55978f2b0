use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("song {0} is already in the library")]
    DuplicateKey(String),

    #[error("stored row has an unusable id {id:?}")]
    CorruptRow { id: String },

    #[error("failed to open media store: {0}")]
    Open(#[source] sqlx::Error),

    #[error("failed to migrate media store schema: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
