use thiserror::Error;

/// Failure inside a credential backend.
///
/// Never leaves the backend: each `CredentialStore` implementation logs it and
/// downgrades to an absent record, `false`, or an empty mapping.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Remote document store answered with an unexpected status.
    #[error("remote store returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Remote document store did not return an id for a newly created document.
    #[error("remote store did not return a document id")]
    MissingDocumentId,
}
