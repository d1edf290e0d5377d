//! Domain-level command and result types.
//!
//! These structs are used by services inside the domain layer and are not
//! exposed over HTTP. The REST layer maps the public DTOs from the `shared`
//! crate onto them and maps results back.

pub mod accounts {
    use crate::domain::models::{Account, Room};
    use serde_json::Value;

    /// Input for creating a new account.
    #[derive(Debug, Clone, Default)]
    pub struct RegisterCommand {
        pub username: Option<String>,
        pub password: Option<String>,
        /// Room code to join, or to create when no room has it yet
        pub room_id: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct RegisterResult {
        pub account: Account,
        pub token: String,
        /// None when the financial data generator failed
        pub financial_data: Option<Value>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct SignInCommand {
        pub username: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct SignInResult {
        pub username: String,
        pub token: String,
        pub room: Option<Room>,
    }

    #[derive(Debug, Clone)]
    pub struct UserRoomResult {
        pub room: Option<Room>,
    }

    #[derive(Debug, Clone)]
    pub struct GeneratedFinancialData {
        pub user_id: String,
        pub data: Value,
    }
}

pub mod rooms {
    /// Input for creating a room; the creator comes from the session.
    #[derive(Debug, Clone, Default)]
    pub struct CreateRoomCommand {
        pub room_name: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct JoinRoomCommand {
        pub room_id: Option<String>,
    }
}

pub mod contributions {
    /// Raw contribution input. `amount` is None when absent or unparseable.
    #[derive(Debug, Clone, Default)]
    pub struct RecordContributionCommand {
        pub room_id: Option<String>,
        pub amount: Option<f64>,
        pub category: Option<String>,
        pub description: Option<String>,
    }
}

pub mod wishlist {
    #[derive(Debug, Clone, Default)]
    pub struct AddWishlistItemCommand {
        pub room_id: Option<String>,
        pub item_name: Option<String>,
        pub description: Option<String>,
        pub estimated_cost: Option<f64>,
        pub priority: Option<String>,
        pub category: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateWishlistItemCommand {
        pub item_id: Option<String>,
        pub action: Option<String>,
        pub contribution_amount: Option<f64>,
        pub status: Option<String>,
    }
}
