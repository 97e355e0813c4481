use salar_catalog::DietPreference;
use salar_shared::Masked;
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

const MIN_NAME_LEN: usize = 3;
const MAX_DIET_NOTES_LEN: usize = 500;

/// Who is booking, collected with every group creation or join
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingContact {
    pub full_name: String,
    pub email: Masked<String>,
    #[serde(default)]
    pub diet: DietPreference,
    /// Allergies and other free-text details
    #[serde(default)]
    pub diet_notes: Option<Masked<String>>,
}

impl BookingContact {
    /// Check the shape of the contact. Reports every failing field at once.
    pub fn validate(&self) -> CoreResult<()> {
        let mut problems = Vec::new();

        if self.full_name.trim().chars().count() < MIN_NAME_LEN {
            problems.push(format!(
                "full_name must have at least {} characters",
                MIN_NAME_LEN
            ));
        }

        if !is_plausible_email(self.email.expose()) {
            problems.push("email is not a valid address".to_string());
        }

        if let Some(notes) = &self.diet_notes {
            if notes.expose().chars().count() > MAX_DIET_NOTES_LEN {
                problems.push(format!(
                    "diet_notes must not exceed {} characters",
                    MAX_DIET_NOTES_LEN
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CoreError::ValidationError(problems.join("; ")))
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
