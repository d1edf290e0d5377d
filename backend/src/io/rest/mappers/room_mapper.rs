use shared::RoomSummary;

use crate::domain::models::Room;

pub struct RoomMapper;

impl RoomMapper {
    /// Convert a domain Room to the summary sent over the wire
    pub fn to_summary(room: Room) -> RoomSummary {
        RoomSummary {
            member_count: room.members.len(),
            id: room.id,
            name: room.name,
            created_at: room.created_at.to_rfc3339(),
            created_by: room.created_by,
            members: room.members,
        }
    }

    pub fn to_summary_list(rooms: Vec<Room>) -> Vec<RoomSummary> {
        rooms.into_iter().map(Self::to_summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_member_count_matches_members() {
        let room = Room {
            id: "AB12CD".to_string(),
            name: "Flat".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
            created_by: "alice".to_string(),
            members: vec!["alice".to_string(), "bob".to_string()],
        };

        let summary = RoomMapper::to_summary(room);
        assert_eq!(summary.member_count, 2);
        assert_eq!(summary.members, vec!["alice", "bob"]);
        assert_eq!(summary.created_at, "2025-01-02T03:04:05+00:00");
    }
}
