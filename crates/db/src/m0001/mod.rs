mod event;
mod event_guest;
mod event_organizer;
mod promotion;
mod promotion_use;
mod transaction;
mod transaction_promotion;
mod user;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "pointshub",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        user::CreateUk1,
        transaction::CreateTable,
        transaction::CreateIdx1,
        transaction::CreateIdx2,
        transaction_promotion::CreateTable,
        promotion::CreateTable,
        promotion::CreateIdx1,
        promotion_use::CreateTable,
        promotion_use::CreateUk1,
        event::CreateTable,
        event_guest::CreateTable,
        event_organizer::CreateTable
    ]
);
