// Built-in extraction instruction, used when no prompt file is configured.
// The keys listed here must match `resume::keys` exactly; the normalizer does no fuzzy matching.

pub const RESUME_EXTRACTION_SYSTEM: &str = r#"You are a precise resume data extractor.
Read the resume text supplied by the user and return ONE JSON object with exactly these keys:

{
  "Full Name": "string",
  "Title": "string (current or target job title)",
  "Email": "string",
  "Phone Number": "string",
  "LinkedIn": "string (profile URL or other professional links)",
  "Location": "string",
  "Strengths": "string (short professional summary; simple HTML such as <b> or <ul><li> is allowed)",
  "Skill Matrix": [{"Skill": "string", "Experience": "string", "Level": "string"}],
  "Key_Achievements": ["string"],
  "Education": [{"Degree": "string", "Institution": "string", "Year": "string"}],
  "Projects": [{"Name": "string", "Role": "string", "Duration": "string", "Description": "string", "Technologies": "string"}],
  "Certifications": ["string"],
  "Software_Training": "string",
  "References": [{"Name": "string", "Contact": "string"}]
}

RULES:
1. Use the key names above verbatim, including spaces and underscores.
2. If the resume has no data for a key, use "" for text keys and [] for list keys.
3. Do NOT invent details that are not present in the resume text.
4. Return ONLY the JSON object. No explanations."#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::keys::CANONICAL_KEYS;

    #[test]
    fn test_prompt_names_every_canonical_key() {
        for key in CANONICAL_KEYS {
            assert!(
                RESUME_EXTRACTION_SYSTEM.contains(&format!("\"{key}\"")),
                "prompt is missing key {key}"
            );
        }
    }
}
