// Resume data: the canonical record, the model extraction call, and the
// normalizer that maps free-form model JSON onto the record.

pub mod branding;
pub mod extraction;
pub mod keys;
pub mod normalize;

use serde::Serialize;
use serde_json::Value;

pub use normalize::Normalizer;

/// Canonical, fully-defaulted resume.
///
/// Every field always holds real data or its type's empty value, so templates
/// never need presence checks. Serialized names are the ones templates bind to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResumeRecord {
    #[serde(rename = "Full_Name")]
    pub full_name: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone_Number")]
    pub phone_number: String,
    #[serde(rename = "LinkedIn")]
    pub linkedin: String,
    #[serde(rename = "Location")]
    pub location: String,
    /// Free text; may carry HTML meant to render unescaped.
    #[serde(rename = "Strengths")]
    pub strengths: String,
    /// Skill entries, kept exactly as the model shaped them.
    #[serde(rename = "Skill_Matrix")]
    pub skill_matrix: Vec<Value>,
    #[serde(rename = "Key_Achievements")]
    pub key_achievements: Vec<String>,
    #[serde(rename = "Education")]
    pub education: Vec<Value>,
    #[serde(rename = "Projects")]
    pub projects: Vec<Value>,
    #[serde(rename = "Certifications")]
    pub certifications: Vec<String>,
    #[serde(rename = "Software_Training")]
    pub software_training: String,
    #[serde(rename = "References")]
    pub references: Vec<Value>,
    /// Base64 branding image, empty when no logo is available.
    #[serde(rename = "LogoBase64")]
    pub logo_base64: String,
}

impl ResumeRecord {
    /// Pretty JSON dump for debug logging.
    pub fn debug_dump(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("<unserializable: {e}>"))
    }
}
