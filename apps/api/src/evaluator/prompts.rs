//! Prompt for candidate evaluation.

use crate::models::candidate::CandidateRow;

pub const EVALUATION_SYSTEM: &str = "You are an expert recruiter analyzing candidate fit.";

pub fn build_evaluation_prompt(candidate: &CandidateRow, role: &str) -> String {
    format!(
        r#"Analyze this candidate for a {role} position and provide a rating.

Candidate Information:
- Name: {name}
- Key Strengths: {strengths}
- Biggest Weakness: {weakness}
- Available Immediately: {available}

Resume Content:
{resume}

Evaluation Criteria:
1. Relevant Experience
2. Skills Match
3. Cultural Fit

Required Output Format (JSON ONLY):
{{
  "rate": 0-100,
  "details": "Concise analysis covering experience, skills, and cultural fit"
}}

Important Instructions:
- Return ONLY valid JSON
- Do not include any explanatory text outside the JSON
- "rate" must be between 0-100
- "details" should be 2-3 sentences"#,
        role = role,
        name = candidate.full_name,
        strengths = candidate.key_strengths,
        weakness = candidate.biggest_weakness,
        available = candidate.available_immediately,
        resume = candidate.resume_text,
    )
}
