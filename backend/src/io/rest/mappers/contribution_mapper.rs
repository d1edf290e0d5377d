use shared::ContributionRecord;

use crate::domain::models::Contribution;

pub struct ContributionMapper;

impl ContributionMapper {
    /// Convert a domain Contribution to its DTO. The user id is the username.
    pub fn to_dto(contribution: Contribution) -> ContributionRecord {
        ContributionRecord {
            room_id: contribution.room_id,
            user_id: contribution.username.clone(),
            username: contribution.username,
            total_contributed: contribution.total_contributed,
            total_expenses: contribution.total_expenses,
            contribution_percentage: contribution.contribution_percentage,
            last_updated: contribution.last_updated.to_rfc3339(),
            monthly_contributions: contribution.monthly_contributions,
            categories: contribution.categories,
        }
    }

    pub fn to_dto_list(contributions: Vec<Contribution>) -> Vec<ContributionRecord> {
        contributions.into_iter().map(Self::to_dto).collect()
    }
}
