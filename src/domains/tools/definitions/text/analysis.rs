//! Counting, scoring and comparing text.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{number, round_half_up, rounded, slice_end, static_regex};

static_regex!(SENTENCE, r"[^.!?]+[.!?]+");
static_regex!(SENTENCE_END, r"[.!?]+");
static_regex!(NON_WORD, r"[^A-Za-z0-9_]+");
static_regex!(PARAGRAPH_BREAK, r"\n\s*\n");
static_regex!(LOWER_WORD, r"\b[a-z]+\b");
static_regex!(VOWEL_GROUP, r"[aeiou]+");

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "summarize_text",
            CATEGORY,
            "Summarize long text into key points",
            json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string", "description": "Text to summarize" },
                    "max_sentences": { "type": "number", "description": "Max sentences in summary", "default": 3 }
                },
                "required": ["text"]
            }),
            summarize_text,
        ),
        ToolDefinition::new(
            "word_count",
            CATEGORY,
            "Count words, characters, sentences, and paragraphs in text",
            json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            }),
            word_count,
        ),
        ToolDefinition::new(
            "text_diff",
            CATEGORY,
            "Compare two texts and find differences",
            json!({
                "type": "object",
                "properties": {
                    "text1": { "type": "string" },
                    "text2": { "type": "string" }
                },
                "required": ["text1", "text2"]
            }),
            text_diff,
        ),
        ToolDefinition::new(
            "palindrome_check",
            CATEGORY,
            "Check if text is a palindrome",
            json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" },
                    "ignore_spaces": { "type": "boolean", "default": true },
                    "ignore_case": { "type": "boolean", "default": true }
                },
                "required": ["text"]
            }),
            palindrome_check,
        ),
        ToolDefinition::new(
            "text_statistics",
            CATEGORY,
            "Advanced text statistics including top words, avg word length, etc.",
            json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            }),
            text_statistics,
        ),
        ToolDefinition::new(
            "check_readability",
            CATEGORY,
            "Check text readability score (Flesch-Kincaid)",
            json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            }),
            check_readability,
        ),
        ToolDefinition::new(
            "anagram_checker",
            CATEGORY,
            "Check if two words are anagrams of each other",
            json!({
                "type": "object",
                "properties": {
                    "word1": { "type": "string" },
                    "word2": { "type": "string" }
                },
                "required": ["word1", "word2"]
            }),
            anagram_checker,
        ),
    ]
}

fn default_true() -> bool {
    true
}

// ============================================================================
// summarize_text
// ============================================================================

#[derive(Debug, Deserialize)]
struct SummarizeParams {
    text: String,
    #[serde(default = "default_max_sentences")]
    max_sentences: f64,
}

fn default_max_sentences() -> f64 {
    3.0
}

/// Extractive summary: sentences ranked by how many frequent long words they hold.
fn summarize_text(params: SummarizeParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let text = params.text.as_str();
    let mut sentences: Vec<&str> = SENTENCE.find_iter(text).map(|m| m.as_str()).collect();
    if sentences.is_empty() {
        sentences.push(text);
    }

    let lower = text.to_lowercase();
    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for word in NON_WORD.split(&lower).filter(|w| w.len() > 4) {
        *frequency.entry(word).or_insert(0) += 1;
    }

    let mut scored: Vec<(&str, usize)> = sentences
        .iter()
        .map(|sentence| {
            let lowered = sentence.to_lowercase();
            let score = NON_WORD
                .split(&lowered)
                .map(|w| frequency.get(w).copied().unwrap_or(0))
                .sum();
            (*sentence, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let keep = slice_end(scored.len(), params.max_sentences);
    let summary = scored[..keep]
        .iter()
        .map(|(s, _)| s.trim())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(json!({
        "summary": summary,
        "original_sentences": sentences.len(),
        "summary_sentences": number(params.max_sentences.min(sentences.len() as f64)),
    }))
}

// ============================================================================
// word_count
// ============================================================================

#[derive(Debug, Deserialize)]
struct TextParams {
    text: String,
}

fn word_count(params: TextParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let text = params.text.as_str();
    let trimmed = text.trim();
    let words = trimmed.split_whitespace().count();
    // An empty text still counts as one token for the time estimates.
    let tokens = words.max(1);

    Ok(json!({
        "characters": text.chars().count(),
        "characters_no_spaces": text.chars().filter(|c| !c.is_whitespace()).count(),
        "words": words,
        "sentences": SENTENCE_END.find_iter(text).count(),
        "paragraphs": PARAGRAPH_BREAK.split(text).filter(|p| !p.is_empty()).count(),
        "reading_time_minutes": tokens.div_ceil(200),
        "speaking_time_minutes": tokens.div_ceil(130),
    }))
}

// ============================================================================
// text_diff
// ============================================================================

#[derive(Debug, Deserialize)]
struct DiffParams {
    text1: String,
    text2: String,
}

fn text_diff(params: DiffParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let lines1: Vec<&str> = params.text1.split('\n').collect();
    let lines2: Vec<&str> = params.text2.split('\n').collect();
    let added: Vec<&str> = lines2.iter().copied().filter(|l| !lines1.contains(l)).collect();
    let removed: Vec<&str> = lines1.iter().copied().filter(|l| !lines2.contains(l)).collect();

    let len1 = params.text1.chars().count() as f64;
    let len2 = params.text2.chars().count() as f64;
    let similarity = 1.0 - (len1 - len2).abs() / len1.max(len2);

    Ok(json!({
        "are_identical": params.text1 == params.text2,
        "similarity_percent": number(round_half_up(similarity * 100.0)),
        "lines_added": added.len(),
        "lines_removed": removed.len(),
        "added_lines": &added[..added.len().min(20)],
        "removed_lines": &removed[..removed.len().min(20)],
    }))
}

// ============================================================================
// palindrome_check
// ============================================================================

#[derive(Debug, Deserialize)]
struct PalindromeParams {
    text: String,
    #[serde(default = "default_true")]
    ignore_spaces: bool,
    #[serde(default = "default_true")]
    ignore_case: bool,
}

fn palindrome_check(params: PalindromeParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let mut cleaned = params.text;
    if params.ignore_spaces {
        cleaned.retain(|c| !c.is_whitespace());
    }
    if params.ignore_case {
        cleaned = cleaned.to_lowercase();
    }
    cleaned.retain(|c| c.is_ascii_alphanumeric());
    let reversed: String = cleaned.chars().rev().collect();

    Ok(json!({
        "is_palindrome": cleaned == reversed,
        "cleaned_text": cleaned,
        "reversed": reversed,
    }))
}

// ============================================================================
// text_statistics
// ============================================================================

fn text_statistics(params: TextParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let lower = params.text.to_lowercase();
    let words: Vec<&str> = LOWER_WORD.find_iter(&lower).map(|m| m.as_str()).collect();

    // Insertion-ordered frequency table so ties keep first-seen order.
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for &word in &words {
        match positions.get(word) {
            Some(&i) => order[i].1 += 1,
            None => {
                positions.insert(word, order.len());
                order.push((word, 1));
            }
        }
    }
    let unique = order.len();
    let mut sorted = order;
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    let total_len: usize = words.iter().map(|w| w.len()).sum();
    let avg_word_len = total_len as f64 / words.len().max(1) as f64;
    let longest = words
        .iter()
        .fold("", |best, &w| if w.len() > best.len() { w } else { best });

    let top: Vec<Value> = sorted
        .iter()
        .take(10)
        .map(|(word, count)| json!({ "word": word, "count": count }))
        .collect();

    Ok(json!({
        "total_words": words.len(),
        "unique_words": unique,
        "avg_word_length": rounded(avg_word_len, 1),
        "top_10_words": top,
        "longest_word": longest,
        "lexical_diversity": rounded(unique as f64 / words.len() as f64, 2),
    }))
}

// ============================================================================
// check_readability
// ============================================================================

fn check_readability(params: TextParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let text = params.text.as_str();
    let sentences = SENTENCE_END.find_iter(text).count().max(1) as f64;
    let words = text.split_whitespace().count().max(1) as f64;
    let letters: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect();
    let syllables = VOWEL_GROUP.find_iter(&letters).count().max(1) as f64;

    let words_per_sentence = words / sentences;
    let syllables_per_word = syllables / words;
    let score = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    let grade = 0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59;
    let level = if score >= 80.0 {
        "Very Easy"
    } else if score >= 60.0 {
        "Easy"
    } else if score >= 50.0 {
        "Medium"
    } else if score >= 30.0 {
        "Hard"
    } else {
        "Very Hard"
    };

    Ok(json!({
        "flesch_kincaid_score": number(round_half_up(score)),
        "grade_level": number(round_half_up(grade)),
        "readability_level": level,
        "avg_words_per_sentence": number(round_half_up(words_per_sentence)),
        "avg_syllables_per_word": rounded(syllables_per_word, 1),
    }))
}

// ============================================================================
// anagram_checker
// ============================================================================

#[derive(Debug, Deserialize)]
struct AnagramParams {
    word1: String,
    word2: String,
}

fn sorted_letters(word: &str) -> String {
    let mut chars: Vec<char> = word
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    chars.sort_unstable();
    chars.into_iter().collect()
}

fn anagram_checker(params: AnagramParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let first = sorted_letters(&params.word1);
    let second = sorted_letters(&params.word2);
    Ok(json!({
        "is_anagram": first == second,
        "word1_sorted": first,
        "word2_sorted": second,
    }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::domains::tools::testing::{ok, run};
    use serde_json::json;

    #[test]
    fn test_word_count_hello_world() {
        let out = ok("word_count", json!({ "text": "Hello world" }));
        assert_eq!(
            out,
            json!({
                "characters": 11,
                "characters_no_spaces": 10,
                "words": 2,
                "sentences": 0,
                "paragraphs": 1,
                "reading_time_minutes": 1,
                "speaking_time_minutes": 1
            })
        );
    }

    #[test]
    fn test_word_count_paragraphs_and_sentences() {
        let out = ok("word_count", json!({ "text": "One. Two!\n\nThree?" }));
        assert_eq!(out["sentences"], 3);
        assert_eq!(out["paragraphs"], 2);
        assert_eq!(out["words"], 3);
    }

    #[test]
    fn test_word_count_requires_text() {
        assert!(run("word_count", json!({ "text": 5 })).is_err());
    }

    #[test]
    fn test_summarize_prefers_frequent_words() {
        let text = "Rust compilers check ownership. Cats sleep. Ownership rules keep programs safe thanks to ownership.";
        let out = ok("summarize_text", json!({ "text": text, "max_sentences": 1 }));
        assert_eq!(out["summary"], "Ownership rules keep programs safe thanks to ownership.");
        assert_eq!(out["original_sentences"], 3);
        assert_eq!(out["summary_sentences"], 1);
    }

    #[test]
    fn test_summarize_without_punctuation() {
        let out = ok("summarize_text", json!({ "text": "no terminal punctuation here" }));
        assert_eq!(out["original_sentences"], 1);
        assert_eq!(out["summary"], "no terminal punctuation here");
    }

    #[test]
    fn test_text_diff() {
        let out = ok("text_diff", json!({ "text1": "a\nb\nc", "text2": "a\nc\nd" }));
        assert_eq!(out["are_identical"], false);
        assert_eq!(out["added_lines"], json!(["d"]));
        assert_eq!(out["removed_lines"], json!(["b"]));
        assert_eq!(out["similarity_percent"], 100);
    }

    #[test]
    fn test_text_diff_empty_similarity_is_null() {
        let out = ok("text_diff", json!({ "text1": "", "text2": "" }));
        assert!(out["similarity_percent"].is_null());
        assert_eq!(out["are_identical"], true);
    }

    #[test]
    fn test_palindrome() {
        let out = ok("palindrome_check", json!({ "text": "A man, a plan, a canal: Panama" }));
        assert_eq!(out["is_palindrome"], true);
        assert_eq!(out["cleaned_text"], "amanaplanacanalpanama");

        let out = ok("palindrome_check", json!({ "text": "Abba", "ignore_case": false }));
        assert_eq!(out["is_palindrome"], false);
    }

    #[test]
    fn test_text_statistics() {
        let out = ok("text_statistics", json!({ "text": "The cat and the hat. The end!" }));
        assert_eq!(out["total_words"], 7);
        assert_eq!(out["unique_words"], 5);
        assert_eq!(out["top_10_words"][0], json!({ "word": "the", "count": 3 }));
        assert_eq!(out["longest_word"], "the");
        assert_eq!(out["lexical_diversity"], 0.71);
    }

    #[test]
    fn test_check_readability_simple_text() {
        let out = ok("check_readability", json!({ "text": "The cat sat. The dog ran." }));
        assert_eq!(out["readability_level"], "Very Easy");
        assert_eq!(out["avg_words_per_sentence"], 3);
        assert_eq!(out["avg_syllables_per_word"], 1);
    }

    #[test]
    fn test_anagram() {
        let out = ok("anagram_checker", json!({ "word1": "Listen", "word2": "Silent" }));
        assert_eq!(out["is_anagram"], true);
        assert_eq!(out["word1_sorted"], "eilnst");
    }
}
