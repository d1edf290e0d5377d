use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Generic `{ "message": ... }` body used by every endpoint that only reports an outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Monetary input as sent by browser forms: either a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// Numeric value, or None when the text form does not parse
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AmountInput::Number(value) => Some(*value),
            AmountInput::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }
}

// ---------------------------------------------------------------------------
// Accounts and sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Optional room code to join (or create) as part of registration
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub username: String,
    pub user_id: String,
    /// Bearer token for the session opened by registration
    pub token: String,
    /// False when the account exists but the financial data generator failed
    pub financial_data_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UsernameQuery {
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsernameAvailableResponse {
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsernameExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SignInRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInResponse {
    pub message: String,
    pub username: String,
    pub token: String,
    pub room: Option<RoomSummary>,
}

/// Username bound to the presented token, or null when no session matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListEntry {
    pub id: String,
    pub username: String,
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserListEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoomResponse {
    pub has_room: bool,
    pub room: Option<RoomSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialDataResponse {
    pub success: bool,
    pub data: Value,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFinancialDataResponse {
    pub username: String,
    pub financial_data: Option<Value>,
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: String,
    pub name: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    pub created_by: String,
    pub member_count: usize,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomResponse {
    pub message: String,
    pub room: RoomSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomListResponse {
    pub rooms: Vec<RoomSummary>,
}

/// `?roomId=` query shared by the room, contribution and wishlist listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RoomIdQuery {
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomLookupResponse {
    pub exists: bool,
    pub room: Option<RoomSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomMember {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomMembersResponse {
    /// Only set when the request was rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub users: Vec<RoomMember>,
}

// ---------------------------------------------------------------------------
// Contributions
// ---------------------------------------------------------------------------

/// Fixed set of expense buckets a contribution is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionCategory {
    Groceries,
    Utilities,
    Rent,
    Entertainment,
    Other,
}

impl ContributionCategory {
    pub const ALL: [ContributionCategory; 5] = [
        ContributionCategory::Groceries,
        ContributionCategory::Utilities,
        ContributionCategory::Rent,
        ContributionCategory::Entertainment,
        ContributionCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionCategory::Groceries => "groceries",
            ContributionCategory::Utilities => "utilities",
            ContributionCategory::Rent => "rent",
            ContributionCategory::Entertainment => "entertainment",
            ContributionCategory::Other => "other",
        }
    }
}

impl fmt::Display for ContributionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContributionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| format!("Unknown contribution category: {}", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub groceries: f64,
    pub utilities: f64,
    pub rent: f64,
    pub entertainment: f64,
    pub other: f64,
}

impl CategoryBreakdown {
    pub fn get(&self, category: ContributionCategory) -> f64 {
        match category {
            ContributionCategory::Groceries => self.groceries,
            ContributionCategory::Utilities => self.utilities,
            ContributionCategory::Rent => self.rent,
            ContributionCategory::Entertainment => self.entertainment,
            ContributionCategory::Other => self.other,
        }
    }

    pub fn add(&mut self, category: ContributionCategory, amount: f64) {
        let bucket = match category {
            ContributionCategory::Groceries => &mut self.groceries,
            ContributionCategory::Utilities => &mut self.utilities,
            ContributionCategory::Rent => &mut self.rent,
            ContributionCategory::Entertainment => &mut self.entertainment,
            ContributionCategory::Other => &mut self.other,
        };
        *bucket += amount;
    }

    pub fn total(&self) -> f64 {
        ContributionCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionRecord {
    pub room_id: String,
    pub user_id: String,
    pub username: String,
    pub total_contributed: f64,
    pub total_expenses: f64,
    pub contribution_percentage: f64,
    pub last_updated: String,
    /// `YYYY-MM` -> amount contributed in that month
    pub monthly_contributions: BTreeMap<String, f64>,
    pub categories: CategoryBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionListResponse {
    pub contributions: Vec<ContributionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecordContributionRequest {
    pub room_id: Option<String>,
    pub amount: Option<AmountInput>,
    pub category: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecomputePercentagesRequest {
    pub room_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Wishlist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("Unknown priority: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WishlistStatus {
    Pending,
    Approved,
    Purchased,
    Cancelled,
}

impl WishlistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WishlistStatus::Pending => "pending",
            WishlistStatus::Approved => "approved",
            WishlistStatus::Purchased => "purchased",
            WishlistStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for WishlistStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(WishlistStatus::Pending),
            "approved" => Ok(WishlistStatus::Approved),
            "purchased" => Ok(WishlistStatus::Purchased),
            "cancelled" => Ok(WishlistStatus::Cancelled),
            other => Err(format!("Unknown wishlist status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    pub username: String,
    pub item_name: String,
    pub description: String,
    pub estimated_cost: f64,
    pub priority: Priority,
    pub category: String,
    pub created_at: String,
    pub status: WishlistStatus,
    /// Usernames who pledged toward the item, in pledge order
    pub contributors: Vec<String>,
    pub contribution_amounts: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistListResponse {
    pub wishlist_items: Vec<WishlistItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddWishlistItemRequest {
    pub room_id: Option<String>,
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub estimated_cost: Option<AmountInput>,
    pub priority: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWishlistItemRequest {
    pub item_id: Option<String>,
    /// One of `contribute`, `uncontribute` or `update_status`
    pub action: Option<String>,
    pub contribution_amount: Option<AmountInput>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemQuery {
    pub item_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItemResponse {
    pub message: String,
    pub item: WishlistItem,
}
