use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format used when telling a team when their gift was already claimed.
pub const CLAIMED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub staff_pass_id: String,
    pub team_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionEntry {
    pub team_name: String,
    pub redeemed_at: DateTime<Utc>,
    pub redeemed_by: String,
}

impl RedemptionEntry {
    pub fn claimed_message(&self) -> String {
        format!(
            "{} from team {} has already claimed the gift on {}",
            self.redeemed_by,
            self.team_name,
            self.redeemed_at.format(CLAIMED_AT_FORMAT)
        )
    }
}

/// Current time truncated to what the database keeps.
pub fn now() -> DateTime<Utc> {
    let millis = Utc::now().timestamp_millis();

    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claimed_message() {
        let entry = RedemptionEntry {
            team_name: "BASS".to_string(),
            redeemed_at: DateTime::from_timestamp_millis(1623772799000).unwrap(),
            redeemed_by: "STAFF_H123804820G".to_string(),
        };

        assert_eq!(
            entry.claimed_message(),
            "STAFF_H123804820G from team BASS has already claimed the gift on 2021-06-15 15:59:59"
        );
    }

    #[test]
    fn test_now_has_millisecond_precision() {
        let now = now();

        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_wire_names() {
        let entry = MappingEntry {
            staff_pass_id: "BOSS_T000000001P".to_string(),
            team_name: "RUST".to_string(),
            created_at: DateTime::from_timestamp_millis(1623872111000).unwrap(),
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"staff_pass_id":"BOSS_T000000001P","team_name":"RUST","created_at":"2021-06-16T19:35:11Z"}"#
        );
    }
}
