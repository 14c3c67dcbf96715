use crate::{
    data::credential::{
        CredentialStore, DocumentCredentialStore, LocalFileCredentialStore,
        RelationalCredentialStore,
    },
    model::{credential::UpsertCredentialParam, storage::HealthStatus},
};

mod document;
mod local_file;
mod relational;
