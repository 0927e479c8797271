//! HTML rendering of an enhanced CV.
//!
//! The output is a single self-contained page with inline styles. Sections
//! are emitted only when they have content. The inspirational quote is the
//! only non-deterministic element.

use rand::seq::IndexedRandom;
use smartcv_core::models::EnhancedCv;

const INSPIRATIONAL_QUOTES: [&str; 8] = [
    "Success is not final, failure is not fatal: it is the courage to continue that counts. - Winston Churchill",
    "The only way to do great work is to love what you do. - Steve Jobs",
    "Innovation distinguishes between a leader and a follower. - Steve Jobs",
    "Your work is going to fill a large part of your life, and the only way to be truly satisfied is to do what you believe is great work. - Steve Jobs",
    "The future belongs to those who believe in the beauty of their dreams. - Eleanor Roosevelt",
    "It is during our darkest moments that we must focus to see the light. - Aristotle",
    "Believe you can and you're halfway there. - Theodore Roosevelt",
    "The only impossible journey is the one you never begin. - Tony Robbins",
];

const STYLES: &str = r#"
        body {
            font-family: 'Arial', sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            background: white;
        }
        .header {
            text-align: center;
            border-bottom: 2px solid #2563eb;
            padding-bottom: 20px;
            margin-bottom: 30px;
        }
        .header h1 {
            margin: 0;
            color: #2563eb;
            font-size: 2.5em;
        }
        .contact-info {
            margin: 10px 0;
            color: #666;
        }
        .section {
            margin-bottom: 30px;
        }
        .section h2 {
            color: #2563eb;
            border-bottom: 1px solid #2563eb;
            padding-bottom: 5px;
            margin-bottom: 15px;
        }
        .summary {
            background: #f8fafc;
            padding: 15px;
            border-left: 4px solid #2563eb;
            margin-bottom: 20px;
        }
        .experience-item, .education-item {
            margin-bottom: 20px;
            border-left: 3px solid #e5e7eb;
            padding-left: 15px;
        }
        .experience-item h3, .education-item h3 {
            margin: 0 0 5px 0;
            color: #374151;
        }
        .company, .institution {
            font-weight: bold;
            color: #2563eb;
        }
        .duration {
            color: #6b7280;
            font-style: italic;
        }
        .skills {
            display: flex;
            flex-wrap: wrap;
            gap: 10px;
        }
        .skill {
            background: #2563eb;
            color: white;
            padding: 5px 12px;
            border-radius: 20px;
            font-size: 0.9em;
        }
        .improvements {
            background: #f0f9ff;
            border: 1px solid #0ea5e9;
            border-radius: 8px;
            padding: 15px;
            margin-top: 20px;
        }
        .improvements h3 {
            color: #0ea5e9;
            margin-top: 0;
        }
        .improvements ul {
            margin: 0;
            padding-left: 20px;
        }
        .improvements li {
            margin-bottom: 5px;
        }
        .ai-footer {
            margin-top: 40px;
            padding: 20px;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            border-radius: 12px;
            text-align: center;
        }
        .ai-footer h3 {
            margin-top: 0;
            color: white;
        }
        .quote {
            font-style: italic;
            margin-top: 15px;
            padding: 10px;
            background: rgba(255,255,255,0.1);
            border-radius: 8px;
            border-left: 4px solid rgba(255,255,255,0.3);
        }
        @media print {
            body { padding: 0; }
            .improvements { display: none; }
            .ai-footer { display: none; }
        }
"#;

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_opt(value: &Option<String>, fallback: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => escape_html(v),
        _ => fallback.to_string(),
    }
}

/// Render an enhanced CV as a standalone HTML document.
pub fn render_cv(cv: &EnhancedCv) -> String {
    let quote = INSPIRATIONAL_QUOTES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(INSPIRATIONAL_QUOTES[0]);
    render_with_quote(cv, quote)
}

fn render_with_quote(cv: &EnhancedCv, quote: &str) -> String {
    let info = &cv.personal_info;
    let title = escape_opt(&info.name, "Enhanced CV");
    let heading = escape_opt(&info.name, "Professional CV");

    let mut body = String::new();

    body.push_str("    <div class=\"header\">\n");
    body.push_str(&format!("        <h1>{}</h1>\n", heading));
    if let Some(email) = info.email.as_deref().filter(|v| !v.is_empty()) {
        body.push_str(&format!(
            "        <div class=\"contact-info\">Email: {}</div>\n",
            escape_html(email)
        ));
    }
    if let Some(phone) = info.phone.as_deref().filter(|v| !v.is_empty()) {
        body.push_str(&format!(
            "        <div class=\"contact-info\">Phone: {}</div>\n",
            escape_html(phone)
        ));
    }
    if let Some(location) = info.location.as_deref().filter(|v| !v.is_empty()) {
        body.push_str(&format!(
            "        <div class=\"contact-info\">Location: {}</div>\n",
            escape_html(location)
        ));
    }
    body.push_str("    </div>\n");

    if let Some(summary) = info.summary.as_deref().filter(|v| !v.is_empty()) {
        body.push_str("    <div class=\"section\">\n");
        body.push_str("        <h2>Professional Summary</h2>\n");
        body.push_str(&format!(
            "        <div class=\"summary\">{}</div>\n",
            escape_html(summary)
        ));
        body.push_str("    </div>\n");
    }

    if !cv.experience.is_empty() {
        body.push_str("    <div class=\"section\">\n");
        body.push_str("        <h2>Professional Experience</h2>\n");
        for exp in &cv.experience {
            body.push_str("        <div class=\"experience-item\">\n");
            body.push_str(&format!(
                "            <h3>{}</h3>\n",
                escape_opt(&exp.title, "Position")
            ));
            body.push_str(&format!(
                "            <div class=\"company\">{}</div>\n",
                escape_opt(&exp.company, "Company")
            ));
            body.push_str(&format!(
                "            <div class=\"duration\">{}</div>\n",
                escape_opt(&exp.duration, "Duration")
            ));
            body.push_str(&format!(
                "            <p>{}</p>\n",
                escape_opt(&exp.description, "Job description and achievements")
            ));
            body.push_str("        </div>\n");
        }
        body.push_str("    </div>\n");
    }

    if !cv.education.is_empty() {
        body.push_str("    <div class=\"section\">\n");
        body.push_str("        <h2>Education</h2>\n");
        for edu in &cv.education {
            body.push_str("        <div class=\"education-item\">\n");
            body.push_str(&format!(
                "            <h3>{}</h3>\n",
                escape_opt(&edu.degree, "Degree")
            ));
            body.push_str(&format!(
                "            <div class=\"institution\">{}</div>\n",
                escape_opt(&edu.institution, "Institution")
            ));
            body.push_str(&format!(
                "            <div class=\"duration\">{}</div>\n",
                escape_opt(&edu.year, "Year")
            ));
            if let Some(details) = edu.details.as_deref().filter(|v| !v.is_empty()) {
                body.push_str(&format!("            <p>{}</p>\n", escape_html(details)));
            }
            body.push_str("        </div>\n");
        }
        body.push_str("    </div>\n");
    }

    if !cv.skills.is_empty() {
        body.push_str("    <div class=\"section\">\n");
        body.push_str("        <h2>Skills</h2>\n");
        body.push_str("        <div class=\"skills\">\n");
        for skill in &cv.skills {
            body.push_str(&format!(
                "            <span class=\"skill\">{}</span>\n",
                escape_html(skill)
            ));
        }
        body.push_str("        </div>\n");
        body.push_str("    </div>\n");
    }

    if !cv.improvements.is_empty() {
        body.push_str("    <div class=\"improvements\">\n");
        body.push_str("        <h3>AI Enhancements Made</h3>\n");
        body.push_str("        <ul>\n");
        for improvement in &cv.improvements {
            body.push_str(&format!(
                "            <li>{}</li>\n",
                escape_html(improvement)
            ));
        }
        body.push_str("        </ul>\n");
        body.push_str("    </div>\n");
    }

    body.push_str("    <div class=\"ai-footer\">\n");
    body.push_str(
        "        <h3>&#128640; This CV was enhanced with SmartCV and AI</h3>\n",
    );
    body.push_str(
        "        <p>Your professional journey has been optimized with cutting-edge artificial intelligence to help you stand out in today's competitive job market.</p>\n",
    );
    body.push_str(&format!(
        "        <div class=\"quote\"><p>&quot;{}&quot;</p></div>\n",
        escape_html(quote)
    ));
    body.push_str("    </div>\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLES}    </style>
</head>
<body>
{body}</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartcv_core::models::{EducationEntry, ExperienceEntry, PersonalInfo};

    fn full_cv() -> EnhancedCv {
        EnhancedCv {
            personal_info: PersonalInfo {
                name: Some("Jane Doe".to_string()),
                email: Some("jane@example.com".to_string()),
                phone: Some("+1 555 0100".to_string()),
                location: Some("Berlin".to_string()),
                summary: Some("Backend engineer".to_string()),
            },
            experience: vec![ExperienceEntry {
                title: Some("Engineer".to_string()),
                company: Some("Acme".to_string()),
                duration: Some("2020-2024".to_string()),
                description: Some("Built things".to_string()),
            }],
            education: vec![EducationEntry {
                degree: Some("BSc".to_string()),
                institution: Some("TU".to_string()),
                year: Some("2019".to_string()),
                details: None,
            }],
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            improvements: vec!["Quantified achievements".to_string()],
            raw_content: None,
        }
    }

    #[test]
    fn test_renders_all_sections_when_populated() {
        let html = render_with_quote(&full_cv(), "quote text");
        assert!(html.contains("<title>Jane Doe</title>"));
        assert!(html.contains("Professional Summary"));
        assert!(html.contains("Professional Experience"));
        assert!(html.contains("Education"));
        assert!(html.contains("<h2>Skills</h2>"));
        assert!(html.contains("AI Enhancements Made"));
        assert!(html.contains("quote text"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let cv = EnhancedCv::default();
        let html = render_with_quote(&cv, "q");
        assert!(!html.contains("Professional Summary"));
        assert!(!html.contains("Professional Experience"));
        assert!(!html.contains("<h2>Education</h2>"));
        assert!(!html.contains("<h2>Skills</h2>"));
        assert!(!html.contains("AI Enhancements Made"));
        assert!(html.contains("Professional CV"));
        assert!(html.contains("<title>Enhanced CV</title>"));
    }

    #[test]
    fn test_skills_only_cv_renders_just_the_skills_section() {
        let cv = EnhancedCv {
            skills: vec!["Go".to_string()],
            ..Default::default()
        };
        let html = render_with_quote(&cv, "q");
        assert!(html.contains("<h2>Skills</h2>"));
        assert!(html.contains("Go"));
        assert!(!html.contains("Professional Experience"));
        assert!(!html.contains("<h2>Education</h2>"));
    }

    #[test]
    fn test_values_are_html_escaped() {
        let mut cv = EnhancedCv::default();
        cv.personal_info.name = Some("<script>alert(1)</script>".to_string());
        cv.skills = vec!["C&C++".to_string()];
        let html = render_with_quote(&cv, "q");
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("C&amp;C++"));
    }

    #[test]
    fn test_random_quote_comes_from_fixed_list() {
        let html = render_cv(&EnhancedCv::default());
        let found = INSPIRATIONAL_QUOTES
            .iter()
            .any(|q| html.contains(&escape_html(q)));
        assert!(found);
    }
}
