use shared::{RegisterResponse, RoomMember, UserListEntry};

use crate::domain::commands::accounts::RegisterResult;
use crate::domain::models::Account;

pub struct AccountMapper;

impl AccountMapper {
    pub fn to_list_entry(account: Account) -> UserListEntry {
        UserListEntry {
            id: account.id,
            username: account.username,
            room_id: account.room_id,
        }
    }

    pub fn to_room_member(account: Account) -> RoomMember {
        RoomMember {
            id: account.id,
            username: account.username,
        }
    }

    /// The message and flag tell the client whether financial data was generated
    pub fn to_register_response(result: RegisterResult) -> RegisterResponse {
        let generated = result.financial_data.is_some();
        let message = if generated {
            "Account created successfully with financial data"
        } else {
            "Account created successfully (financial data generation failed)"
        };

        RegisterResponse {
            message: message.to_string(),
            username: result.account.username,
            user_id: result.account.id,
            token: result.token,
            financial_data_generated: generated,
            financial_data: result.financial_data,
        }
    }
}
