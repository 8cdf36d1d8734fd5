use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Icon identifiers the client knows how to draw.
pub mod icon {
    pub const CIGARETTE: &str = "cigarette";
    pub const APPLE: &str = "apple";
    pub const DUMBBELL: &str = "dumbbell";
    pub const CALENDAR: &str = "calendar";

    pub const KNOWN: [&str; 4] = [CIGARETTE, APPLE, DUMBBELL, CALENDAR];
}

/// A prevention tip. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthTip {
    pub title: String,
    pub icon: String,
    pub description: String,
}

impl HealthTip {
    /// The icon to draw. Matching is case-insensitive and unknown
    /// identifiers fall back to [`icon::APPLE`].
    pub fn icon_name(&self) -> &'static str {
        let lowered = self.icon.to_lowercase();
        icon::KNOWN
            .into_iter()
            .find(|known| *known == lowered)
            .unwrap_or(icon::APPLE)
    }
}

/// The built-in tips shown when the remote collection is empty or not loaded.
pub fn fallback_tips() -> Vec<HealthTip> {
    vec![
        HealthTip {
            title: "Quit Smoking".to_string(),
            icon: icon::CIGARETTE.to_string(),
            description: "Smoking is a leading cause of cancer. Quitting smoking significantly \
                          reduces your risk of developing various types of cancer and improves \
                          overall health."
                .to_string(),
        },
        HealthTip {
            title: "Eat Healthy".to_string(),
            icon: icon::APPLE.to_string(),
            description: "A balanced diet rich in fruits, vegetables, and whole grains can help \
                          prevent cancer. Limit processed foods and red meat consumption."
                .to_string(),
        },
        HealthTip {
            title: "Exercise Regularly".to_string(),
            icon: icon::DUMBBELL.to_string(),
            description: "Regular physical activity helps maintain a healthy weight and reduces \
                          cancer risk. Aim for at least 30 minutes of moderate exercise daily."
                .to_string(),
        },
        HealthTip {
            title: "Regular Checkups".to_string(),
            icon: icon::CALENDAR.to_string(),
            description: "Early detection through regular health screenings can save lives. \
                          Schedule annual checkups and follow recommended screening guidelines."
                .to_string(),
        },
    ]
}
