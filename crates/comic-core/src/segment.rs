//! Narrative segmenter: raw text → scenes → panel contents.
//!
//! Segmentation runs two explicit passes, built on `winnow`:
//!
//! 1. **Transitions**: the text is cut at narrative transition words
//!    ("suddenly", "meanwhile", …), matched case-insensitively as whole
//!    words. The word itself is the delimiter and is dropped.
//! 2. **Sentences**: each piece is cut at `. ? ! ;` followed by
//!    whitespace, and at runs of newlines.
//!
//! Fragments shorter than `MIN_WORDS_PER_PANEL` are then folded backward
//! into the previous scene in a single left-to-right pass.

use crate::error::InputError;
use crate::model::{BubblePosition, PanelContent, Scene, VisualizationHint};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use winnow::ascii::multispace1;
use winnow::combinator::alt;
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

pub const MIN_WORDS_PER_PANEL: usize = 10;
pub const MAX_WORDS_PER_PANEL: usize = 50;
pub const MIN_PANELS: usize = 1;
pub const MAX_PANELS: usize = 6;

/// Words that open a new narrative beat.
pub const TRANSITION_WORDS: [&str; 12] = [
    "later",
    "meanwhile",
    "suddenly",
    "after",
    "before",
    "then",
    "next",
    "finally",
    "eventually",
    "soon",
    "when",
    "while",
];

/// Bubble anchors, cycled by panel index.
pub const BUBBLE_POSITIONS: [BubblePosition; 6] = [
    BubblePosition::TOP_LEFT,
    BubblePosition::TOP_RIGHT,
    BubblePosition::BOTTOM_LEFT,
    BubblePosition::BOTTOM_RIGHT,
    BubblePosition::CENTER,
    BubblePosition::TOP_CENTER,
];

const SENTENCE_STOPS: [char; 5] = ['.', '?', '!', ';', '\n'];

// ─── Analysis ────────────────────────────────────────────────────────────

/// Result of analyzing one block of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub scenes: Vec<Scene>,
    pub panels: Vec<PanelContent>,
    /// Panel count the policy asked for; `panels.len()` may be smaller.
    pub total_panels: usize,
}

/// Segment `text` into panels.
///
/// `hints` are optional per-fragment suggestions; pass `None` when the
/// suggestion service is unavailable.
///
/// # Errors
/// `InputError::EmptyText` for empty or whitespace-only input.
pub fn analyze_text(
    text: &str,
    hints: Option<&[VisualizationHint]>,
) -> Result<Analysis, InputError> {
    if text.trim().is_empty() {
        return Err(InputError::EmptyText);
    }

    let scenes = split_into_scenes(text, hints);
    debug!("Detected {} scenes", scenes.len());

    let total_panels = calculate_optimal_panel_count(&scenes);
    debug!("Calculated optimal panel count: {total_panels}");

    let panels = distribute_scenes_into_panels(&scenes, total_panels);
    info!("Created {total_panels} panels from {} scenes", scenes.len());

    Ok(Analysis {
        scenes,
        panels,
        total_panels,
    })
}

/// Wire shape handed to the surrounding application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub success: bool,
    pub panels: Vec<PanelContent>,
    pub total_panels: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<Analysis, InputError>> for AnalysisReport {
    fn from(result: Result<Analysis, InputError>) -> Self {
        match result {
            Ok(analysis) => Self {
                success: true,
                panels: analysis.panels,
                total_panels: analysis.total_panels,
                error: None,
            },
            Err(err) => Self {
                success: false,
                panels: Vec::new(),
                total_panels: 0,
                error: Some(err.to_string()),
            },
        }
    }
}

// ─── Scenes ──────────────────────────────────────────────────────────────

/// Split `text` into scenes. Returns an empty list only for blank input.
///
/// Hint `i` belongs to raw fragment `i`; when that fragment is folded into
/// the previous scene, the hint is merged into that scene's visualization.
pub fn split_into_scenes(text: &str, hints: Option<&[VisualizationHint]>) -> Vec<Scene> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut fragments: Vec<&str> = split_on_transitions(text)
        .into_iter()
        .flat_map(split_on_sentences)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect();
    if fragments.is_empty() {
        fragments.push(text.trim());
    }

    let mut scenes: Vec<Scene> = Vec::with_capacity(fragments.len());
    for (index, fragment) in fragments.into_iter().enumerate() {
        let hint = hints.and_then(|hints| hints.get(index));
        let short = fragment.split_whitespace().count() < MIN_WORDS_PER_PANEL;

        match scenes.last_mut() {
            Some(previous) if short => {
                previous.text.push(' ');
                previous.text.push_str(fragment);
                if let Some(hint) = hint {
                    previous.visualization.merge(hint);
                }
            }
            _ => {
                let mut scene = Scene::new(fragment);
                if let Some(hint) = hint {
                    scene.visualization.merge(hint);
                }
                scenes.push(scene);
            }
        }
    }

    scenes
}

/// Panels needed for `scenes`: enough to keep each under
/// `MAX_WORDS_PER_PANEL`, at least one per two scenes, within
/// `[MIN_PANELS, MAX_PANELS]`.
pub fn calculate_optimal_panel_count(scenes: &[Scene]) -> usize {
    let total_words: usize = scenes.iter().map(Scene::word_count).sum();
    let by_words = total_words.div_ceil(MAX_WORDS_PER_PANEL);
    let by_scenes = scenes.len().div_ceil(2);
    by_words.max(by_scenes).clamp(MIN_PANELS, MAX_PANELS)
}

/// Group consecutive scenes into at most `panel_count` panels.
pub fn distribute_scenes_into_panels(scenes: &[Scene], panel_count: usize) -> Vec<PanelContent> {
    if scenes.is_empty() {
        return Vec::new();
    }
    let scenes_per_panel = scenes.len().div_ceil(panel_count.max(1));

    scenes
        .chunks(scenes_per_panel)
        .enumerate()
        .map(|(index, group)| PanelContent {
            text: group
                .iter()
                .map(|scene| scene.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            position: bubble_position(index),
        })
        .collect()
}

pub fn bubble_position(panel_index: usize) -> BubblePosition {
    BUBBLE_POSITIONS[panel_index % BUBBLE_POSITIONS.len()]
}

pub fn is_transition_word(word: &str) -> bool {
    TRANSITION_WORDS
        .iter()
        .any(|transition| transition.eq_ignore_ascii_case(word))
}

// ─── Pass 1: transitions ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Token<'a> {
    Word(&'a str),
    Gap,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn token<'a>(input: &mut &'a str) -> ModalResult<Token<'a>> {
    alt((
        take_while(1.., is_word_char).map(Token::Word),
        take_while(1.., |c: char| !is_word_char(c)).value(Token::Gap),
    ))
    .parse_next(input)
}

fn split_on_transitions(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    let mut start = 0;

    while !rest.is_empty() {
        let offset = text.len() - rest.len();
        match token.parse_next(&mut rest) {
            Ok(Token::Word(word)) if is_transition_word(word) => {
                pieces.push(&text[start..offset]);
                start = text.len() - rest.len();
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }

    pieces.push(&text[start..]);
    pieces
}

// ─── Pass 2: sentence boundaries ─────────────────────────────────────────

fn sentence_break(input: &mut &str) -> ModalResult<()> {
    alt((
        (one_of(['.', '?', '!', ';']), multispace1).void(),
        take_while(1.., '\n').void(),
    ))
    .parse_next(input)
}

fn split_on_sentences(piece: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut rest = piece;
    let mut start = 0;

    while !rest.is_empty() {
        let offset = piece.len() - rest.len();
        let checkpoint = rest;
        if sentence_break.parse_next(&mut rest).is_ok() {
            fragments.push(&piece[start..offset]);
            start = piece.len() - rest.len();
            continue;
        }

        rest = checkpoint;
        let plain: ModalResult<&str> = take_till(1.., SENTENCE_STOPS).parse_next(&mut rest);
        if plain.is_err() {
            // Stop character not followed by whitespace; keep it in the fragment.
            rest = checkpoint;
            let mut chars = rest.chars();
            chars.next();
            rest = chars.as_str();
        }
    }

    fragments.push(&piece[start..]);
    fragments
}
