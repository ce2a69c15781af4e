// Resume extraction prompt templates.

pub const RESUME_PARSE_SYSTEM: &str = "\
You are an expert at extracting structured data from resumes. \
Do not forget to extract the projects if available.";

pub const RESUME_PARSE_PROMPT: &str = r#"
You are a strict resume data parser.

Extract structured data from the resume below and return ONLY raw JSON.

ABSOLUTE RULES:
- Do NOT wrap the response in markdown.
- Do NOT use ```json.
- Do NOT add explanations.
- Return ONLY valid JSON.
- All dates MUST be in yyyy-MM format (example: 2023-05).
- If currently working, set end_date as "" and is_current as true.
- If no professional experience exists, return experience as [].
- NEVER fabricate experience.

SECTION RULES:
- "experience" must ONLY contain paid jobs, internships, or freelance roles.
- DO NOT include college, school, degree, CGPA, percentage, or academic entries inside "experience".
- If an entry contains words like:
  "Bachelor", "BTech", "Degree", "Intermediate", "College", "Institute", "University", "CGPA", "Percentage"
  it MUST go inside "education".
- Do NOT duplicate entries across sections.

Resume:
{resume_text}

Return EXACTLY this JSON structure:

{
  "professional_summary": "",
  "skills": [],
  "personal_info": {
    "image": "",
    "full_name": "",
    "profession": "",
    "email": "",
    "phone": "",
    "location": "",
    "linkedin": "",
    "website": ""
  },
  "experience": [
    {
      "company": "",
      "position": "",
      "start_date": "",
      "end_date": "",
      "description": "",
      "is_current": false
    }
  ],
  "project": [
    {
      "name": "",
      "type": "",
      "description": ""
    }
  ],
  "education": [
    {
      "institution": "",
      "degree": "",
      "field": "",
      "graduation_date": "",
      "gpa": ""
    }
  ]
}
"#;

pub fn resume_parse_prompt(resume_text: &str) -> String {
    RESUME_PARSE_PROMPT.replace("{resume_text}", resume_text)
}
