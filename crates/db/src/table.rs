use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum User {
    Table,
    Id,
    Utorid,
    Name,
    Role,
    Points,
    Verified,
    Suspicious,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Transaction {
    Table,
    Id,
    UserId,
    Kind,
    Amount,
    Spent,
    Redeemed,
    RelatedId,
    Suspicious,
    Remark,
    ProcessedAt,
    ProcessedBy,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum TransactionPromotion {
    Table,
    TransactionId,
    PromotionId,
}

#[derive(Iden, Clone)]
pub enum Promotion {
    Table,
    Id,
    Name,
    Kind,
    StartTime,
    EndTime,
    MinSpending,
    Rate,
    Points,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum PromotionUse {
    Table,
    UserId,
    PromotionId,
    UsedAt,
}

#[derive(Iden, Clone)]
pub enum Event {
    Table,
    Id,
    Name,
    PointsTotal,
    PointsRemain,
    PointsAwarded,
    Capacity,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum EventGuest {
    Table,
    EventId,
    UserId,
    Confirmed,
}

#[derive(Iden, Clone)]
pub enum EventOrganizer {
    Table,
    EventId,
    UserId,
}
