// All LLM prompt constants for the concrete agents.
// Every system prompt enforces JSON-only output; templates use `{placeholder}`
// slots filled with `.replace()` before sending.

/// Shared tail appended when a step carries custom instructions.
pub const CUSTOM_INSTRUCTIONS_PREFIX: &str = "\n\nAdditional instructions from the user:\n";

// ── resume-builder ──────────────────────────────────────────────────────────

pub const RESUME_BUILDER_SYSTEM: &str =
    "You are an expert resume strategist. Given a candidate's master career data \
    and a target job, select the most relevant items for a tailored resume. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

pub const RESUME_BUILDER_TEMPLATE: &str = r#"Select the best items from the candidate's master data for {role_label}.

Job description:
{job_description}

Master data (each item carries its id — reference items by id only):
{data_json}

Return a JSON object with this EXACT schema (no extra fields):
{
  "selected_experience_ids": ["<uuid>"],
  "selected_project_ids": ["<uuid>"],
  "selected_skill_ids": ["<uuid>"],
  "selected_education_ids": ["<uuid>"],
  "rationale": "one short paragraph explaining the selection",
  "alternatives": [
    {"id": "<uuid>", "reason": "why this is a weaker but viable pick"}
  ]
}

Select at least {min_experiences} experiences and {min_skills} skills when the
master data contains that many. Prefer items whose bullets or skills overlap
the job description."#;

// ── content-optimizer ───────────────────────────────────────────────────────

pub const CONTENT_OPTIMIZER_SYSTEM: &str =
    "You are an expert resume writer. Rewrite resume content to align with a \
    target job description while staying strictly truthful to the source text. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

pub const CONTENT_OPTIMIZER_TEMPLATE: &str = r#"Rewrite the candidate's resume content for {role_label}.

Job description:
{job_description}

Aggressiveness: {aggressiveness} (conservative = minimal edits, bold = substantial reframing).
Focus areas: {focus_areas}

Content to optimize (experiences and projects with ids):
{content_json}

Return a JSON object with this EXACT schema:
{
  "changes": [
    {
      "item_id": "<uuid or null>",
      "section": "experience",
      "original": "original bullet text",
      "optimized": "rewritten bullet text",
      "reason": "why this rewrite helps for this job"
    }
  ],
  "summary": "one-sentence description of the overall optimization"
}

Never invent accomplishments that are not grounded in the original text."#;

// ── grammar-enhancer ────────────────────────────────────────────────────────

pub const GRAMMAR_ENHANCER_SYSTEM: &str =
    "You are a meticulous copy editor for professional resumes. Correct grammar, \
    tense consistency, and wordiness without changing meaning. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

pub const GRAMMAR_ENHANCER_TEMPLATE: &str = r#"Edit the following resume text for grammar and style.

Text:
{text}

Return a JSON object with this EXACT schema:
{
  "corrected_text": "the full corrected text",
  "corrections": [
    {"original": "lead a team", "corrected": "led a team", "kind": "tense"}
  ]
}

If the text needs no changes, return it unchanged with an empty corrections list."#;

// ── skills-extractor ────────────────────────────────────────────────────────

pub const SKILLS_EXTRACTOR_SYSTEM: &str =
    "You are an expert job description analyst. Extract required skills and \
    compare them against a candidate's existing skills. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

pub const SKILLS_EXTRACTOR_TEMPLATE: &str = r#"Extract the skills this job requires and analyze the candidate's gaps.

Job description:
{job_description}

Candidate's existing skills:
{existing_skills_json}

Return a JSON object with this EXACT schema:
{
  "required_skills": [
    {"name": "Rust", "category": "languages", "importance": "required", "matched": true}
  ],
  "skill_gaps": {
    "missing": ["Kubernetes"],
    "recommendations": ["Add a bullet demonstrating container orchestration experience"]
  }
}

"importance" is one of: "required", "preferred", "nice-to-have".
"matched" is true when the candidate's existing skills cover the requirement."#;

// ── resume-reviewer ─────────────────────────────────────────────────────────

pub const RESUME_REVIEWER_SYSTEM: &str =
    "You are a senior hiring manager reviewing a resume. Give a candid, \
    structured assessment with concrete next steps. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

pub const RESUME_REVIEWER_TEMPLATE: &str = r#"Review this resume{for_role}.

Resume content:
{resume_json}

Return a JSON object with this EXACT schema:
{
  "overall_score": 72,
  "strengths": ["Clear impact metrics in recent roles"],
  "weaknesses": ["Summary is generic"],
  "recommendations": {
    "immediate": ["Rewrite the summary to name the target role"],
    "short_term": ["Quantify the two oldest experience bullets"],
    "long_term": ["Add a certification relevant to the field"]
  }
}

"overall_score" is 0-100. Every recommendations list must be present (may be empty)."#;

// ── ats-optimizer ───────────────────────────────────────────────────────────

pub const ATS_OPTIMIZER_SYSTEM: &str =
    "You are an applicant-tracking-system (ATS) compatibility analyst. Compare a \
    resume against a job description for keyword coverage and format risks. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

pub const ATS_OPTIMIZER_TEMPLATE: &str = r#"Analyze this resume's ATS compatibility for {role_label}.

Job description:
{job_description}

Resume content:
{resume_json}

Return a JSON object with this EXACT schema:
{
  "compatibility_score": 64,
  "keyword_matches": ["Rust", "distributed systems"],
  "missing_keywords": ["Kubernetes"],
  "format_issues": ["Dates use inconsistent formats"],
  "action_plan": {
    "immediate": [
      {"action": "Add 'Kubernetes' to the skills section", "reason": "appears 4 times in the JD"}
    ],
    "later": [
      {"action": "Normalize date formats", "reason": "some parsers reject mixed formats"}
    ]
  }
}

"compatibility_score" is 0-100. Both action_plan lists must be present (may be empty)."#;
