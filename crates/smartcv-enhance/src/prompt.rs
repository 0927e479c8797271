//! Prompt construction shared by the providers.

const JSON_SCHEMA: &str = r#"{
  "personalInfo": {
    "name": "Full Name",
    "email": "email@example.com",
    "phone": "phone number",
    "location": "City, Country",
    "summary": "Professional summary paragraph"
  },
  "experience": [
    {
      "title": "Job Title",
      "company": "Company Name",
      "duration": "Start Date - End Date",
      "description": "Enhanced job description with achievements"
    }
  ],
  "education": [
    {
      "degree": "Degree Name",
      "institution": "Institution Name",
      "year": "Year",
      "details": "Additional details"
    }
  ],
  "skills": ["skill1", "skill2", "skill3"],
  "improvements": ["List of improvements made"]
}"#;

/// Prompt for providers that receive the PDF itself (Gemini).
pub fn pdf_prompt() -> String {
    format!(
        "Please analyze this CV PDF and enhance it by improving the content, \
         structure, and language. Make it more professional and ATS-friendly. \
         Add relevant keywords and improve descriptions. Format the response \
         as JSON with the following structure:\n{JSON_SCHEMA}\n\n\
         Only return the JSON object, no additional text."
    )
}

/// Prompt for providers that receive the extracted text (Cohere).
pub fn text_prompt(cv_text: &str) -> String {
    format!(
        "Please enhance this CV by improving the content, structure, and \
         language. Make it more professional and ATS-friendly. Add relevant \
         keywords and improve descriptions. Format the response as JSON with \
         the following structure:\n{JSON_SCHEMA}\n\n\
         Only return the JSON object, no additional text.\n\n\
         Original CV text:\n{cv_text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_prompt_contains_schema_and_instruction() {
        let prompt = pdf_prompt();
        assert!(prompt.contains("personalInfo"));
        assert!(prompt.contains("improvements"));
        assert!(prompt.contains("Only return the JSON object"));
    }

    #[test]
    fn test_text_prompt_embeds_cv_text() {
        let prompt = text_prompt("JANE DOE\nSoftware Engineer");
        assert!(prompt.contains("Original CV text:"));
        assert!(prompt.contains("JANE DOE"));
        assert!(prompt.contains("personalInfo"));
    }
}
