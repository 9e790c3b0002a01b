use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod membership {
    use super::*;

    /// Role of a user in a group.
    ///
    /// The server treats roles as:
    /// - `ADMIN`: can add members, create shifts and assign them.
    /// - `USER`: plain member; can be assigned to shifts.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum MembershipRole {
        Admin,
        User,
    }

    impl MembershipRole {
        /// Returns the canonical role string used by the engine/database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Admin => "admin",
                Self::User => "user",
            }
        }
    }

    /// Request body for adding a member.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberAdd {
        pub username: String,
    }

    /// A member with their role.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub username: String,
        pub name: Option<String>,
        pub email: String,
        pub role: MembershipRole,
    }

    /// Response body for listing members.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub members: Vec<MemberView>,
    }
}

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        /// Contact address of the group.
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: String,
        pub name: String,
        pub email: String,
    }

    /// A group together with its member list.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupDetail {
        pub id: String,
        pub name: String,
        pub email: String,
        pub members: Vec<membership::MemberView>,
    }

    /// One of the requester's groups, with the role held on it.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserGroupView {
        pub group: GroupView,
        pub role: membership::MembershipRole,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserGroupsResponse {
        pub groups: Vec<UserGroupView>,
    }

    /// `role` is `null` when the requester holds no membership; absence is a
    /// normal outcome, not an error.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PermissionResponse {
        pub role: Option<membership::MembershipRole>,
    }
}

pub mod shift {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShiftNew {
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub start_at: DateTime<FixedOffset>,
        /// RFC3339 timestamp; must be after `start_at`.
        pub end_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShiftCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShiftView {
        pub id: Uuid,
        pub group_id: String,
        pub start_at: DateTime<FixedOffset>,
        pub end_at: DateTime<FixedOffset>,
    }

    /// A shift with the usernames assigned to it.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShiftDetail {
        pub id: Uuid,
        pub group_id: String,
        pub start_at: DateTime<FixedOffset>,
        pub end_at: DateTime<FixedOffset>,
        pub assignees: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShiftsResponse {
        pub shifts: Vec<ShiftDetail>,
    }

    /// Request body for assigning a member to a shift.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShiftAssign {
        pub username: String,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
        pub name: Option<String>,
        pub email: String,
    }

    /// Current user plus the shifts assigned to them.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MeResponse {
        pub user: UserView,
        pub shifts: Vec<shift::ShiftView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub name: Option<String>,
        pub email: String,
    }

    /// Query for the exact-match email lookup.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserFind {
        pub email: String,
    }
}

pub mod calendar {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CalendarQuery {
        pub year: i32,
        /// Calendar month, 1..=12.
        pub month: u32,
    }

    /// One calendar cell: a date, its day-of-week offset (0 = Sunday) and
    /// the shifts starting on that day.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DayCellView {
        pub date: NaiveDate,
        pub weekday: u8,
        pub shifts: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CalendarResponse {
        pub year: i32,
        pub month: u32,
        pub cells: Vec<DayCellView>,
    }
}
