// All LLM prompt constants for the Analysis module.
// Templates use `{job_description}` and `{resume_text}` placeholders, filled in a
// single pass so user text containing braces is never re-expanded.

use crate::analysis::mode::AnalysisMode;

/// Per-page vision transcription instruction.
pub const EXTRACTION_INSTRUCTION: &str = "Extract ALL text from this resume image exactly as it appears. \
    Include everything: contact info, work experience, education, skills, projects, achievements. \
    Preserve the formatting and order.";

/// Non-vision fallback. The model cannot see the page and answers generically.
pub const FALLBACK_EXTRACTION_PROMPT: &str = "I have a resume image. Please help me analyze it. \
    Since I can't see the image, I'll describe what a typical resume contains. \
    Please provide a template analysis and ask the user to paste their actual resume text for accurate analysis.";

/// ATS scoring prompt. The `Overall Score: N/100` line is what the score parser looks for first.
pub const ATS_SCORE_TEMPLATE: &str = r#"JOB DESCRIPTION:
{job_description}

RESUME CONTENT:
{resume_text}

TASK: Analyze this resume against the job description and provide a REAL ATS compatibility score.

BE BRUTALLY HONEST. If the resume is terrible, irrelevant, or doesn't match, give a LOW score and explain why.

SCORING CRITERIA (100 points total):
- Skills Match (30 points): How well do resume skills match job requirements?
- Experience Relevance (30 points): Is experience relevant, sufficient, and well-described?
- Education & Qualifications (15 points): Does education match requirements?
- Keyword Usage (15 points): Are important job keywords present and well-integrated?
- Overall Fit & Presentation (10 points): General suitability and professionalism

FORMAT YOUR RESPONSE EXACTLY LIKE THIS:

# ATS Compatibility Analysis

## Overall Score: [0-100]/100

### Detailed Breakdown:
**Skills Match:** [0-30]/30 - [Specific assessment with examples]
**Experience Relevance:** [0-30]/30 - [Specific assessment with examples]
**Education & Qualifications:** [0-15]/15 - [Specific assessment with examples]
**Keyword Usage:** [0-15]/15 - [Specific assessment with examples]
**Overall Fit:** [0-10]/10 - [Specific assessment with examples]

### Critical Issues Found:
- [List specific mismatches, missing requirements, or poor quality content]
- [Be very specific about what's wrong]

### Improvement Suggestions:
- [Actionable suggestions based on actual gaps]
- [Provide exact examples of how to improve]

### Missing Keywords/Skills:
- [List important job requirements missing from resume]
- [Include both hard and soft skills]

Base your analysis SOLELY on the actual resume content compared to the job description."#;

pub const PERSONALITY_TEMPLATE: &str = r#"JOB DESCRIPTION:
{job_description}

RESUME CONTENT:
{resume_text}

TASK: Infer the candidate's professional profile from how the resume is written and what it emphasizes.

Focus on personality and working-style traits, and how they fit the role described above.

FORMAT YOUR RESPONSE LIKE THIS:

# Professional Profile Analysis

### Writing Style:
- [Tone, clarity, confidence, use of metrics]

### Inferred Professional Traits:
- [Trait] - [Evidence quoted or paraphrased from the resume]

### Career Progression:
- [Trajectory, growth in scope, consistency]

### Fit With This Role's Culture:
- [Where the traits align or clash with the job description]

Only infer traits that the resume content actually supports."#;

pub const MISSING_KEYWORDS_TEMPLATE: &str = r#"JOB DESCRIPTION:
{job_description}

RESUME CONTENT:
{resume_text}

TASK: Compare the keywords and skills in the job description with those present in the resume.

Focus on keyword gaps an applicant tracking system would penalize.

FORMAT YOUR RESPONSE LIKE THIS:

# Missing Keywords Analysis

### Missing Hard Skills:
- [Keyword] - [Where it appears in the job description]

### Missing Soft Skills:
- [Keyword] - [Where it appears in the job description]

### Present But Underused:
- [Keyword] - [How to surface it more prominently]

### Suggested Placements:
- [Resume section] - [Exact phrasing that integrates the keyword truthfully]

Never suggest claiming skills the resume gives no evidence for."#;

pub const OPTIMIZATION_TEMPLATE: &str = r#"JOB DESCRIPTION:
{job_description}

RESUME CONTENT:
{resume_text}

TASK: Identify the highest-impact improvements that would make this resume stronger for this job.

Focus on concrete optimization tips, ordered by expected impact.

FORMAT YOUR RESPONSE LIKE THIS:

# Resume Optimization Suggestions

### Top Priority Changes:
1. [Change] - [Why it matters for this job]

### Bullet Point Rewrites:
- Before: [Original bullet]
  After: [Improved bullet with measurable impact]

### Structure & Formatting:
- [Section order, length, readability issues]

### Quick Wins:
- [Small edits that can be made in minutes]

Base every suggestion on the actual resume content."#;

fn template_for(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::AtsScore => ATS_SCORE_TEMPLATE,
        AnalysisMode::PersonalityAnalysis => PERSONALITY_TEMPLATE,
        AnalysisMode::MissingKeywords => MISSING_KEYWORDS_TEMPLATE,
        AnalysisMode::ResumeOptimization => OPTIMIZATION_TEMPLATE,
    }
}

/// Builds the exact instruction text for `mode`. Pure; no I/O.
pub fn build_prompt(mode: AnalysisMode, job_description: &str, resume_text: &str) -> String {
    fill_template(
        template_for(mode),
        &[
            ("{job_description}", job_description),
            ("{resume_text}", resume_text),
        ],
    )
}

/// Replaces each placeholder in one left-to-right pass over the template.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
