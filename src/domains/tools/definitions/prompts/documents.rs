//! Business writing templates: emails, job ads, press releases.

use serde::Deserialize;
use serde_json::{Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::fmt_number;

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "email_template_generator",
            CATEGORY,
            "Generate professional email templates",
            json!({
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "enum": [
                            "welcome", "follow_up", "cold_outreach", "apology", "rejection",
                            "proposal", "invoice_reminder", "thank_you", "announcement"
                        ]
                    },
                    "recipient_name": { "type": "string" },
                    "sender_name": { "type": "string" },
                    "company": { "type": "string" },
                    "key_details": { "type": "string" }
                },
                "required": ["type", "recipient_name", "sender_name"]
            }),
            email_template_generator,
        ),
        ToolDefinition::new(
            "job_description_generator",
            CATEGORY,
            "Generate job description template",
            json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "company": { "type": "string" },
                    "department": { "type": "string" },
                    "employment_type": { "type": "string", "enum": ["full-time", "part-time", "contract", "internship"] },
                    "experience_years": { "type": "number" },
                    "location": { "type": "string" },
                    "salary_range": { "type": "string" }
                },
                "required": ["title", "company"]
            }),
            job_description_generator,
        ),
        ToolDefinition::new(
            "press_release_template",
            CATEGORY,
            "Generate a press release template",
            json!({
                "type": "object",
                "properties": {
                    "company": { "type": "string" },
                    "headline": { "type": "string" },
                    "subheadline": { "type": "string" },
                    "city": { "type": "string" },
                    "news_summary": { "type": "string" },
                    "quote_person": { "type": "string" },
                    "quote_title": { "type": "string" }
                },
                "required": ["company", "headline"]
            }),
            press_release_template,
        ),
    ]
}

fn default_company() -> String {
    "our company".to_string()
}

// ============================================================================
// email_template_generator
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum EmailKind {
    Welcome,
    FollowUp,
    ColdOutreach,
    Apology,
    Rejection,
    Proposal,
    InvoiceReminder,
    ThankYou,
    Announcement,
}

#[derive(Debug, Deserialize)]
struct EmailParams {
    #[serde(rename = "type")]
    kind: EmailKind,
    recipient_name: String,
    sender_name: String,
    #[serde(default = "default_company")]
    company: String,
    #[serde(default)]
    key_details: String,
}

fn email_template_generator(params: EmailParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let EmailParams { kind, recipient_name: to, sender_name: from, company, key_details: details } = params;

    let (subject, body) = match kind {
        EmailKind::Welcome => (
            format!("Welcome to {company}!"),
            format!(
                "Hi {to},\n\nWelcome to {company}! We're thrilled to have you on board.\n\n{details}\n\nIf you have any questions, don't hesitate to reach out.\n\nBest regards,\n{from}"
            ),
        ),
        EmailKind::FollowUp => (
            "Following up on our conversation".to_string(),
            format!(
                "Hi {to},\n\nI wanted to follow up on our recent conversation. {details}\n\nWould you be available for a quick call this week?\n\nBest,\n{from}"
            ),
        ),
        EmailKind::ColdOutreach => (
            format!("Quick question about {company}"),
            format!(
                "Hi {to},\n\nI hope this finds you well. I came across your work and was impressed by what you're doing.\n\n{details}\n\nWould you be open to a brief 15-minute call?\n\nBest regards,\n{from}"
            ),
        ),
        EmailKind::Apology => (
            "Our sincere apologies".to_string(),
            format!(
                "Dear {to},\n\nWe sincerely apologize for the inconvenience caused. {details}\n\nWe take full responsibility and are committed to making this right. Please let us know how we can help.\n\nSincerely,\n{from}"
            ),
        ),
        EmailKind::Proposal => (
            format!("Proposal from {company}"),
            format!(
                "Dear {to},\n\nThank you for the opportunity to present our proposal.\n\n{details}\n\nI'd be happy to walk you through the details at your convenience.\n\nBest regards,\n{from}"
            ),
        ),
        EmailKind::InvoiceReminder => (
            "Invoice Payment Reminder".to_string(),
            format!(
                "Dear {to},\n\nThis is a friendly reminder that your invoice is due.\n\n{details}\n\nPlease let us know if you have any questions.\n\nThank you,\n{from}"
            ),
        ),
        EmailKind::ThankYou => (
            format!("Thank you, {to}!"),
            format!(
                "Dear {to},\n\nThank you so much for your time and support.\n\n{details}\n\nIt's a pleasure working with you.\n\nWarm regards,\n{from}"
            ),
        ),
        EmailKind::Rejection => (
            "Regarding your application".to_string(),
            format!(
                "Dear {to},\n\nThank you for your interest and the time you invested. {details}\n\nWhile we won't be moving forward at this time, we encourage you to apply for future opportunities.\n\nBest wishes,\n{from}"
            ),
        ),
        EmailKind::Announcement => (
            format!("Exciting News from {company}!"),
            format!(
                "Dear {to},\n\nWe're excited to share some news with you!\n\n{details}\n\nStay tuned for more updates. Thank you for your continued support!\n\nBest,\n{from}"
            ),
        ),
    };

    Ok(json!({ "subject": subject, "body": body }))
}

// ============================================================================
// job_description_generator
// ============================================================================

fn default_department() -> String {
    "General".to_string()
}

fn default_employment_type() -> String {
    "full-time".to_string()
}

fn default_experience_years() -> f64 {
    3.0
}

fn default_location() -> String {
    "Remote".to_string()
}

fn default_salary_range() -> String {
    "Competitive".to_string()
}

#[derive(Debug, Deserialize)]
struct JobParams {
    title: String,
    company: String,
    #[serde(default = "default_department")]
    department: String,
    #[serde(default = "default_employment_type")]
    employment_type: String,
    #[serde(default = "default_experience_years")]
    experience_years: f64,
    #[serde(default = "default_location")]
    location: String,
    #[serde(default = "default_salary_range")]
    salary_range: String,
}

fn job_description_generator(params: JobParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let JobParams { title, company, department, employment_type, experience_years, location, salary_range } =
        params;
    let years = fmt_number(experience_years);
    let careers_domain: String = company
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let description = format!(
        "# {title}
**Company:** {company}
**Department:** {department}
**Type:** {employment_type}
**Location:** {location}
**Salary:** {salary_range}

## About the Role
We are looking for an experienced {title} to join our {department} team at {company}. You will play a key role in driving our mission forward.

## Requirements
- {years}+ years of experience in a related role
- Strong communication and collaboration skills
- Problem-solving mindset
- [Add specific technical skills]
- [Add domain expertise]

## Responsibilities
- Lead key initiatives within the {department} team
- Collaborate cross-functionally to deliver results
- Drive continuous improvement
- Mentor junior team members
- [Add role-specific responsibilities]

## What We Offer
- Competitive salary: {salary_range}
- Health, dental, and vision insurance
- Flexible work arrangements
- Professional development budget
- [Add company perks]

## How to Apply
Send your resume and cover letter to careers@{careers_domain}.com"
    );

    Ok(json!({
        "job_description": description,
        "title": title,
        "company": company,
        "employment_type": employment_type,
    }))
}

// ============================================================================
// press_release_template
// ============================================================================

fn default_city() -> String {
    "San Francisco".to_string()
}

fn default_quote_person() -> String {
    "CEO".to_string()
}

fn default_quote_title() -> String {
    "Chief Executive Officer".to_string()
}

#[derive(Debug, Deserialize)]
struct PressReleaseParams {
    company: String,
    headline: String,
    #[serde(default)]
    subheadline: String,
    #[serde(default = "default_city")]
    city: String,
    #[serde(default)]
    news_summary: String,
    #[serde(default = "default_quote_person")]
    quote_person: String,
    #[serde(default = "default_quote_title")]
    quote_title: String,
}

fn press_release_template(params: PressReleaseParams, ctx: &mut ToolContext) -> ToolResult<Value> {
    let PressReleaseParams { company, headline, subheadline, city, news_summary, quote_person, quote_title } =
        params;
    let dateline = ctx.now().format("%B %-d, %Y");
    let upper_headline = headline.to_uppercase();

    let release = format!(
        "FOR IMMEDIATE RELEASE

{upper_headline}
{subheadline}

{city}, {dateline} \u{2014} {company} today announced [key announcement here].

{news_summary}

\"[Compelling quote about why this matters],\" said {quote_person}, {quote_title} of {company}. \"[Second sentence expanding on the quote].\"

[Additional paragraph with supporting details, data, or context]

About {company}
{company} is [brief 2-3 sentence company description]. For more information, visit [website].

###

Media Contact:
[Name]
[Title]
[Email]
[Phone]"
    );

    Ok(json!({
        "press_release": release,
        "company": company,
        "headline": headline,
    }))
}
