//! Team workflow templates: meetings, stories, OKRs, content planning.

use serde::Deserialize;
use serde_json::{Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{capped_count, fmt_number, number, slice_end};

/// Minutes kept back from every agenda for opening and wrap-up.
const AGENDA_OVERHEAD_MINUTES: f64 = 10.0;

const MAX_KEY_RESULTS: usize = 100;

const POSTING_DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];
const POSTING_TIMES: [&str; 5] = ["9:00 AM", "12:00 PM", "3:00 PM", "5:00 PM", "7:00 PM"];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "meeting_agenda_generator",
            CATEGORY,
            "Generate a structured meeting agenda",
            json!({
                "type": "object",
                "properties": {
                    "meeting_title": { "type": "string" },
                    "duration_minutes": { "type": "number", "default": 60 },
                    "attendees": { "type": "array", "items": { "type": "string" } },
                    "topics": { "type": "array", "items": { "type": "string" } },
                    "meeting_type": {
                        "type": "string",
                        "enum": [
                            "team_standup", "project_kickoff", "retrospective", "planning",
                            "all_hands", "one_on_one", "custom"
                        ]
                    }
                },
                "required": ["meeting_title"]
            }),
            meeting_agenda_generator,
        ),
        ToolDefinition::new(
            "user_story_generator",
            CATEGORY,
            "Generate Agile user stories with acceptance criteria",
            json!({
                "type": "object",
                "properties": {
                    "feature": { "type": "string" },
                    "user_type": { "type": "string", "default": "user" },
                    "goal": { "type": "string" },
                    "reason": { "type": "string" }
                },
                "required": ["feature", "goal"]
            }),
            user_story_generator,
        ),
        ToolDefinition::new(
            "okr_generator",
            CATEGORY,
            "Generate OKR (Objectives & Key Results) framework",
            json!({
                "type": "object",
                "properties": {
                    "objective": { "type": "string" },
                    "team": { "type": "string" },
                    "timeframe": { "type": "string", "default": "Q1 2025" },
                    "key_results_count": { "type": "number", "default": 3 }
                },
                "required": ["objective"]
            }),
            okr_generator,
        ),
        ToolDefinition::new(
            "content_calendar_generator",
            CATEGORY,
            "Generate a content calendar for social media",
            json!({
                "type": "object",
                "properties": {
                    "brand": { "type": "string" },
                    "industry": { "type": "string" },
                    "platforms": { "type": "array", "items": { "type": "string" } },
                    "posts_per_week": { "type": "number", "default": 5 },
                    "content_pillars": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["brand", "industry"]
            }),
            content_calendar_generator,
        ),
    ]
}

// ============================================================================
// meeting_agenda_generator
// ============================================================================

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MeetingKind {
    TeamStandup,
    ProjectKickoff,
    Retrospective,
    Planning,
    AllHands,
    OneOnOne,
    #[default]
    Custom,
}

impl MeetingKind {
    fn default_topics(self) -> &'static [&'static str] {
        match self {
            Self::TeamStandup => &[
                "What did you accomplish yesterday?",
                "What will you work on today?",
                "Any blockers?",
            ],
            Self::ProjectKickoff => &[
                "Project overview & goals",
                "Roles & responsibilities",
                "Timeline & milestones",
                "Risk identification",
                "Next steps",
            ],
            Self::Retrospective => &[
                "What went well?",
                "What could be improved?",
                "Action items for next sprint",
            ],
            Self::Planning => &[
                "Priority review",
                "Sprint goal setting",
                "Task assignment",
                "Capacity planning",
            ],
            Self::AllHands => &[
                "Company updates",
                "Department highlights",
                "Q&A session",
                "Upcoming events",
            ],
            Self::OneOnOne => &[
                "Check-in & wellbeing",
                "Progress on goals",
                "Challenges & support needed",
                "Feedback exchange",
            ],
            Self::Custom => &["Topic 1", "Topic 2", "Discussion"],
        }
    }
}

fn default_duration() -> f64 {
    60.0
}

#[derive(Debug, Deserialize)]
struct AgendaParams {
    meeting_title: String,
    #[serde(default = "default_duration")]
    duration_minutes: f64,
    #[serde(default)]
    attendees: Vec<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    meeting_type: MeetingKind,
}

fn meeting_agenda_generator(params: AgendaParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let topics: Vec<String> = if params.topics.is_empty() {
        params
            .meeting_type
            .default_topics()
            .iter()
            .map(|t| t.to_string())
            .collect()
    } else {
        params.topics
    };
    let per_topic = ((params.duration_minutes - AGENDA_OVERHEAD_MINUTES) / topics.len() as f64).floor();
    let per_topic_text = fmt_number(per_topic);

    let attendees = if params.attendees.is_empty() {
        "TBD".to_string()
    } else {
        params.attendees.join(", ")
    };
    let items = topics
        .iter()
        .enumerate()
        .map(|(i, topic)| format!("{}. {topic} *({per_topic_text} min)*", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    let agenda = format!(
        "# {}\n**Duration:** {} minutes\n**Attendees:** {attendees}\n\n## Agenda\n\n{items}\n\n## Action Items\n- [ ] \n- [ ] \n\n## Notes\n\n## Decisions Made\n",
        params.meeting_title,
        fmt_number(params.duration_minutes)
    );

    Ok(json!({
        "agenda": agenda,
        "meeting_title": params.meeting_title,
        "duration_minutes": number(params.duration_minutes),
        "topics": topics,
        "estimated_time_per_topic": number(per_topic),
    }))
}

// ============================================================================
// user_story_generator
// ============================================================================

fn default_user_type() -> String {
    "user".to_string()
}

fn default_reason() -> String {
    "achieve my objective".to_string()
}

#[derive(Debug, Deserialize)]
struct UserStoryParams {
    feature: String,
    #[serde(default = "default_user_type")]
    user_type: String,
    goal: String,
    #[serde(default = "default_reason")]
    reason: String,
}

fn user_story_generator(params: UserStoryParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let UserStoryParams { feature, user_type, goal, reason } = params;
    Ok(json!({
        "user_story": format!("As a **{user_type}**, I want to **{goal}** so that I can **{reason}**."),
        "acceptance_criteria": [
            format!("Given I am a {user_type}"),
            format!("When I interact with the {feature} feature"),
            format!("Then I should be able to {goal}"),
            "And the system should respond within acceptable time",
            "And I should receive appropriate feedback"
        ],
        "feature": feature,
        "definition_of_done": [
            "Feature implemented and tested",
            "Unit tests written and passing",
            "Code reviewed and approved",
            "Documentation updated",
            "Product owner sign-off"
        ],
        "story_points_estimate": "TBD",
        "priority": "Medium",
    }))
}

// ============================================================================
// okr_generator
// ============================================================================

fn default_team() -> String {
    "Team".to_string()
}

fn default_timeframe() -> String {
    "Q1 2025".to_string()
}

fn default_key_results_count() -> f64 {
    3.0
}

#[derive(Debug, Deserialize)]
struct OkrParams {
    objective: String,
    #[serde(default = "default_team")]
    team: String,
    #[serde(default = "default_timeframe")]
    timeframe: String,
    #[serde(default = "default_key_results_count")]
    key_results_count: f64,
}

fn okr_generator(params: OkrParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let count = capped_count(params.key_results_count, MAX_KEY_RESULTS);
    let key_results: Vec<Value> = (1..=count)
        .map(|id| {
            json!({
                "id": id,
                "description": format!(
                    "Key Result {id}: [Specific, measurable outcome related to \"{}\"]",
                    params.objective
                ),
                "metric": "Define metric (e.g., increase X from Y to Z)",
                "baseline": "Current value",
                "target": "Target value",
                "progress": "0%"
            })
        })
        .collect();

    Ok(json!({
        "okr": {
            "objective": {
                "statement": params.objective,
                "owner": params.team,
                "timeframe": params.timeframe
            },
            "key_results": key_results
        },
        "tips": [
            "Make key results measurable (numbers, %)",
            "Aim for 70% completion as success (stretch goals)",
            "Review weekly, reassess quarterly"
        ]
    }))
}

// ============================================================================
// content_calendar_generator
// ============================================================================

fn default_platforms() -> Vec<String> {
    ["LinkedIn", "Twitter", "Instagram"].map(String::from).to_vec()
}

fn default_posts_per_week() -> f64 {
    5.0
}

fn default_pillars() -> Vec<String> {
    ["Educational", "Entertaining", "Promotional", "Inspirational", "Engagement"]
        .map(String::from)
        .to_vec()
}

#[derive(Debug, Deserialize)]
struct CalendarParams {
    brand: String,
    industry: String,
    #[serde(default = "default_platforms")]
    platforms: Vec<String>,
    #[serde(default = "default_posts_per_week")]
    posts_per_week: f64,
    #[serde(default = "default_pillars")]
    content_pillars: Vec<String>,
}

/// Item `i` of a rotating list; `None` when the list is empty.
fn rotating(items: &[String], i: usize) -> Option<&str> {
    if items.is_empty() {
        return None;
    }
    Some(items[i % items.len()].as_str())
}

fn content_calendar_generator(params: CalendarParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    let hashtag_tip = format!(
        "#{} #{} #[trending hashtag]",
        strip(&params.industry),
        strip(&params.brand)
    );

    let days = slice_end(POSTING_DAYS.len(), params.posts_per_week);
    let calendar: Vec<Value> = POSTING_DAYS[..days]
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let pillar = rotating(&params.content_pillars, i);
            json!({
                "day": day,
                "platform": rotating(&params.platforms, i),
                "content_pillar": pillar,
                "post_idea": format!(
                    "{} post about {} for {}",
                    pillar.unwrap_or("undefined"),
                    params.industry,
                    params.brand
                ),
                "best_time": POSTING_TIMES[i],
                "hashtag_tip": hashtag_tip
            })
        })
        .collect();

    Ok(json!({
        "brand": params.brand,
        "industry": params.industry,
        "platforms": params.platforms,
        "weekly_calendar": calendar,
        "content_pillars": params.content_pillars,
        "monthly_posts_estimate": number(params.posts_per_week * 4.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::ok;

    #[test]
    fn test_agenda_from_meeting_type() {
        let out = ok(
            "meeting_agenda_generator",
            json!({ "meeting_title": "Daily", "duration_minutes": 15, "meeting_type": "team_standup" }),
        );
        assert_eq!(out["estimated_time_per_topic"], 1);
        assert_eq!(out["topics"].as_array().unwrap().len(), 3);
        let agenda = out["agenda"].as_str().unwrap();
        assert!(agenda.starts_with("# Daily\n**Duration:** 15 minutes\n**Attendees:** TBD\n"));
        assert!(agenda.contains("1. What did you accomplish yesterday? *(1 min)*"));
    }

    #[test]
    fn test_agenda_explicit_topics_win() {
        let out = ok(
            "meeting_agenda_generator",
            json!({
                "meeting_title": "Sync",
                "attendees": ["Ana", "Bo"],
                "topics": ["Roadmap", "Hiring"],
                "meeting_type": "retrospective"
            }),
        );
        assert_eq!(out["topics"], json!(["Roadmap", "Hiring"]));
        assert_eq!(out["estimated_time_per_topic"], 25);
        assert_eq!(out["duration_minutes"], 60);
        assert!(out["agenda"].as_str().unwrap().contains("**Attendees:** Ana, Bo"));
    }

    #[test]
    fn test_user_story() {
        let out = ok(
            "user_story_generator",
            json!({ "feature": "Export", "goal": "download a CSV" }),
        );
        assert_eq!(
            out["user_story"],
            "As a **user**, I want to **download a CSV** so that I can **achieve my objective**."
        );
        assert_eq!(out["acceptance_criteria"][1], "When I interact with the Export feature");
        assert_eq!(out["priority"], "Medium");
    }

    #[test]
    fn test_okr_counts_and_caps() {
        let out = ok("okr_generator", json!({ "objective": "Grow revenue" }));
        let results = out["okr"]["key_results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0]["description"],
            "Key Result 1: [Specific, measurable outcome related to \"Grow revenue\"]"
        );
        assert_eq!(out["okr"]["objective"]["owner"], "Team");

        let out = ok("okr_generator", json!({ "objective": "x", "key_results_count": 1e9 }));
        assert_eq!(out["okr"]["key_results"].as_array().unwrap().len(), MAX_KEY_RESULTS);
    }

    #[test]
    fn test_content_calendar_rotation() {
        let out = ok(
            "content_calendar_generator",
            json!({ "brand": "Brew Ly", "industry": "Coffee Shops", "posts_per_week": 4, "platforms": ["X"] }),
        );
        let calendar = out["weekly_calendar"].as_array().unwrap();
        assert_eq!(calendar.len(), 4);
        assert_eq!(calendar[3]["day"], "Thursday");
        assert_eq!(calendar[3]["platform"], "X");
        assert_eq!(calendar[1]["content_pillar"], "Entertaining");
        assert_eq!(calendar[0]["hashtag_tip"], "#CoffeeShops #BrewLy #[trending hashtag]");
        assert_eq!(calendar[2]["best_time"], "3:00 PM");
        assert_eq!(out["monthly_posts_estimate"], 16);
    }
}
