use crate::{
    data::user_token::UserTokenRepository, error::AppError,
    model::credential::UpsertCredentialParam,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory::user_token::UserTokenFactory};

mod delete;
mod find_by_user_id;
mod get_all;
mod upsert;
