//! Role profiles: default interview questions and the expectations file per role.

/// A role the analyzer knows how to evaluate against.
#[derive(Debug, Clone, Copy)]
pub struct RoleProfile {
    pub name: &'static str,
    /// File under `ROLE_DATA_DIR` holding one expectation per line.
    pub expectations_file: &'static str,
    pub default_questions: [&'static str; 3],
}

pub const ROLE_PROFILES: &[RoleProfile] = &[
    RoleProfile {
        name: "AI / ML Intern",
        expectations_file: "ai_ml_intern.txt",
        default_questions: [
            "Explain the difference between supervised and unsupervised learning with an example.",
            "How would you evaluate the performance of a classification model?",
            "Describe a machine learning project you would build end-to-end.",
        ],
    },
    RoleProfile {
        name: "Software Engineering Intern",
        expectations_file: "software_intern.txt",
        default_questions: [
            "Explain the difference between an array and a linked list.",
            "How would you debug a program that produces incorrect output?",
            "What is the time complexity of common sorting algorithms?",
        ],
    },
    RoleProfile {
        name: "Data Science Intern",
        expectations_file: "data_science_intern.txt",
        default_questions: [
            "How do you handle missing values in a dataset?",
            "Explain the difference between precision and recall.",
            "Describe your approach to exploratory data analysis.",
        ],
    },
];

/// Used when the role is not in [`ROLE_PROFILES`].
pub const GENERIC_QUESTIONS: [&str; 3] = [
    "Explain a technical project you have worked on.",
    "How do you approach problem-solving in programming?",
    "What challenges do you face when learning new technologies?",
];

/// Looks up a role by name, ignoring case and surrounding whitespace.
pub fn find_role(role: &str) -> Option<&'static RoleProfile> {
    let role = role.trim();
    ROLE_PROFILES
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(role))
}

/// Returns exactly three default questions for the role.
pub fn get_default_questions(role: &str) -> [&'static str; 3] {
    find_role(role)
        .map(|p| p.default_questions)
        .unwrap_or(GENERIC_QUESTIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_role_questions() {
        let qs = get_default_questions("Data Science Intern");
        assert_eq!(qs[0], "How do you handle missing values in a dataset?");
    }

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        assert_eq!(
            get_default_questions("  ai / ml intern "),
            ROLE_PROFILES[0].default_questions
        );
    }

    #[test]
    fn test_unknown_role_falls_back_to_generic() {
        assert_eq!(get_default_questions("Astronaut"), GENERIC_QUESTIONS);
        assert_eq!(get_default_questions(""), GENERIC_QUESTIONS);
    }

    #[test]
    fn test_every_profile_has_distinct_non_empty_questions() {
        for profile in ROLE_PROFILES {
            for q in profile.default_questions {
                assert!(!q.trim().is_empty());
            }
            assert_ne!(profile.default_questions[0], profile.default_questions[1]);
            assert_ne!(profile.default_questions[1], profile.default_questions[2]);
        }
    }
}
