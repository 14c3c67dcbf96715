use crate::{
    data::tracked_channel::TrackedChannelRepository, error::AppError,
    model::tracked_channel::UpsertTrackedChannelParam,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory::tracked_channel::TrackedChannelFactory};

mod delete;
mod get_all;
mod set_inactive;
mod upsert;
