use serde::{Deserialize, Serialize};

/// Texts of the announcements shown in the banner.
///
/// Every field has a default, so a configuration file only needs to list the
/// texts it wants to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub intro: String,
    /// `{item}` is replaced with the item label.
    pub item_found: String,
    pub door_closed: String,
    pub door_opens: String,
    pub wrong_answer: String,
    pub no_response: String,
    pub win: String,
}

impl Default for Messages {
    fn default() -> Self {
        Messages {
            intro: "Lead the red dot to the yellow exit.".to_string(),
            item_found: "You found: {item}".to_string(),
            door_closed: "This door is closed.".to_string(),
            door_opens: "The door opens.".to_string(),
            wrong_answer: "Wrong answer.".to_string(),
            no_response: "No response.".to_string(),
            win: "Well done! You won!".to_string(),
        }
    }
}

impl Messages {
    pub fn item_found(&self, label: &str) -> String {
        self.item_found.replace("{item}", label)
    }
}
