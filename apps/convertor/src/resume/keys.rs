// Canonical keys the model is instructed to emit. Lookups are exact and case-sensitive.

pub const FULL_NAME: &str = "Full Name";
pub const TITLE: &str = "Title";
pub const EMAIL: &str = "Email";
pub const PHONE_NUMBER: &str = "Phone Number";
pub const LINKEDIN: &str = "LinkedIn";
pub const LOCATION: &str = "Location";
pub const STRENGTHS: &str = "Strengths";
pub const SKILL_MATRIX: &str = "Skill Matrix";
pub const KEY_ACHIEVEMENTS: &str = "Key_Achievements";
pub const EDUCATION: &str = "Education";
pub const PROJECTS: &str = "Projects";
pub const CERTIFICATIONS: &str = "Certifications";
pub const SOFTWARE_TRAINING: &str = "Software_Training";
pub const REFERENCES: &str = "References";

pub const CANONICAL_KEYS: [&str; 14] = [
    FULL_NAME,
    TITLE,
    EMAIL,
    PHONE_NUMBER,
    LINKEDIN,
    LOCATION,
    STRENGTHS,
    SKILL_MATRIX,
    KEY_ACHIEVEMENTS,
    EDUCATION,
    PROJECTS,
    CERTIFICATIONS,
    SOFTWARE_TRAINING,
    REFERENCES,
];
