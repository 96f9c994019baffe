use serde::Serialize;

/// A persisted transaction, one variant per kind.
///
/// Storage is a single flexible table, but in-process logic pattern-matches
/// on this union instead of probing optional columns.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Transaction {
    Purchase {
        id: String,
        user_id: String,
        spent: f64,
        earned: i64,
        promotion_ids: Vec<String>,
        suspicious: bool,
        remark: Option<String>,
        created_by: String,
        created_at: i64,
    },
    Adjustment {
        id: String,
        user_id: String,
        amount: i64,
        related_id: Option<String>,
        promotion_ids: Vec<String>,
        remark: Option<String>,
        created_by: String,
        created_at: i64,
    },
    Redemption {
        id: String,
        user_id: String,
        /// 0 while pending; `-redeemed` once processed.
        amount: i64,
        redeemed: i64,
        processed_at: Option<i64>,
        processed_by: Option<String>,
        remark: Option<String>,
        created_by: String,
        created_at: i64,
    },
    Transfer {
        id: String,
        user_id: String,
        /// Negative on the sender's row, positive on the recipient's.
        amount: i64,
        related_user_id: String,
        remark: Option<String>,
        created_by: String,
        created_at: i64,
    },
    Event {
        id: String,
        user_id: String,
        amount: i64,
        event_id: String,
        remark: Option<String>,
        created_by: String,
        created_at: i64,
    },
}

impl Transaction {
    pub fn id(&self) -> &str {
        match self {
            Transaction::Purchase { id, .. }
            | Transaction::Adjustment { id, .. }
            | Transaction::Redemption { id, .. }
            | Transaction::Transfer { id, .. }
            | Transaction::Event { id, .. } => id,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            Transaction::Purchase { user_id, .. }
            | Transaction::Adjustment { user_id, .. }
            | Transaction::Redemption { user_id, .. }
            | Transaction::Transfer { user_id, .. }
            | Transaction::Event { user_id, .. } => user_id,
        }
    }

    /// The point delta this row has applied to the ledger so far.
    pub fn amount(&self) -> i64 {
        match self {
            Transaction::Purchase { earned, .. } => *earned,
            Transaction::Adjustment { amount, .. }
            | Transaction::Redemption { amount, .. }
            | Transaction::Transfer { amount, .. }
            | Transaction::Event { amount, .. } => *amount,
        }
    }
}
