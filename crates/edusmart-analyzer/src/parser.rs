//! Parse model output into an analysis result
//!
//! Two tiers: a strict JSON parse, and a line-oriented section parser used
//! only when the strict parse fails structurally. Neither tier can fail; the
//! worst case is an empty [`AnalysisResult`].

use edusmart_domain::AnalysisResult;
use serde_json::{Map, Value};
use tracing::{debug, warn};

const KEY_TOPICS: &str = "key_topics";
const LEARNING_OBJECTIVES: &str = "learning_objectives";
const SUGGESTED_ACTIVITIES: &str = "suggested_activities";

/// Items must be longer than this many characters after prefix stripping
const MIN_ITEM_CHARS: usize = 3;

/// Parse a raw model response
pub fn parse_response(raw: &str) -> AnalysisResult {
    match parse_strict(raw) {
        Ok(result) => {
            debug!("Structured response parsed ({} items)", result.total_items());
            result
        }
        Err(reason) => {
            warn!("Malformed structured response ({}), parsing sections instead", reason);
            parse_sections(raw)
        }
    }
}

/// Strict tier: a JSON object whose known keys are arrays of strings
///
/// Missing keys yield empty vectors and unknown keys are ignored. A known key
/// holding `null`, a non-array, or an array with a non-string item fails the
/// whole object, so the response goes to the section parser instead. Returns
/// a description of the structural problem on failure.
pub fn parse_strict(raw: &str) -> Result<AnalysisResult, String> {
    let json_str = strip_code_fence(raw);

    let json: Value =
        serde_json::from_str(&json_str).map_err(|e| format!("JSON parse error: {}", e))?;

    let obj = json
        .as_object()
        .ok_or_else(|| "Expected JSON object".to_string())?;

    Ok(AnalysisResult::from_parts(
        string_array(obj, KEY_TOPICS)?,
        string_array(obj, LEARNING_OBJECTIVES)?,
        string_array(obj, SUGGESTED_ACTIVITIES)?,
    ))
}

/// Remove a surrounding Markdown code fence, if any
fn strip_code_fence(response: &str) -> String {
    let trimmed = response.trim();

    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    // Skip the opening fence line (``` or ```json) and a closing fence
    let mut lines: Vec<&str> = trimmed.lines().skip(1).collect();
    if lines.last().is_some_and(|line| line.trim_start().starts_with("```")) {
        lines.pop();
    }
    lines.join("\n")
}

fn string_array(obj: &Map<String, Value>, key: &str) -> Result<Vec<String>, String> {
    let Some(value) = obj.get(key) else {
        return Ok(Vec::new());
    };

    let items = value
        .as_array()
        .ok_or_else(|| format!("'{}' is not an array", key))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("'{}' contains a non-string item", key))
        })
        .collect()
}

/// Section the heuristic parser is currently filling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseSection {
    None,
    KeyTopics,
    LearningObjectives,
    SuggestedActivities,
}

/// Header markers, matched against the lower-cased line in order
const SECTION_MARKERS: &[(&str, ParseSection)] = &[
    ("key topic", ParseSection::KeyTopics),
    ("learning objective", ParseSection::LearningObjectives),
    ("suggested activit", ParseSection::SuggestedActivities),
    ("teaching activit", ParseSection::SuggestedActivities),
    ("recommended activit", ParseSection::SuggestedActivities),
];

#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Header(ParseSection),
    /// List item with its prefix stripped
    Item(&'a str),
    Other,
}

fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    let lower = trimmed.to_lowercase();

    if let Some((_, section)) = SECTION_MARKERS
        .iter()
        .find(|(marker, _)| lower.contains(marker))
    {
        return LineKind::Header(*section);
    }

    if is_list_item(trimmed) {
        return LineKind::Item(strip_item_prefix(trimmed));
    }

    LineKind::Other
}

fn is_list_item(line: &str) -> bool {
    match line.chars().next() {
        Some('-' | '•' | '*') => true,
        Some(c) if c.is_ascii_digit() => line.chars().take(3).any(|c| c == '.'),
        _ => false,
    }
}

fn strip_item_prefix(line: &str) -> &str {
    line.trim_start_matches(|c: char| matches!(c, '-' | '•' | '*' | '.' | ' ') || c.is_ascii_digit())
        .trim()
}

/// Advance the parser by one line
///
/// Returns the next section and, if the line contributes one, the item to
/// append to that section.
fn step(state: ParseSection, kind: LineKind<'_>) -> (ParseSection, Option<&str>) {
    match kind {
        LineKind::Header(section) => (section, None),
        LineKind::Item(item)
            if state != ParseSection::None && item.chars().count() > MIN_ITEM_CHARS =>
        {
            (state, Some(item))
        }
        LineKind::Item(_) | LineKind::Other => (state, None),
    }
}

fn section_mut(result: &mut AnalysisResult, section: ParseSection) -> Option<&mut Vec<String>> {
    match section {
        ParseSection::None => None,
        ParseSection::KeyTopics => Some(&mut result.key_topics),
        ParseSection::LearningObjectives => Some(&mut result.learning_objectives),
        ParseSection::SuggestedActivities => Some(&mut result.suggested_activities),
    }
}

/// Heuristic tier: recover list items under recognised section headers
pub fn parse_sections(raw: &str) -> AnalysisResult {
    let mut result = AnalysisResult::new();
    let mut state = ParseSection::None;

    for line in raw.lines() {
        let (next, item) = step(state, classify(line));
        state = next;
        if let (Some(item), Some(items)) = (item, section_mut(&mut result, state)) {
            items.push(item.to_string());
        }
    }

    debug!("Section parser recovered {} items", result.total_items());
    result
}
