//! Help prompt aggregation.
//!
//! Screens hand the orchestrator an unordered list of `(glyph, action)`
//! hints. `aggregate` turns that list into what the help bar shows: one
//! entry per glyph, complementary d-pad glyphs that trigger the same action
//! folded into one, ordered by button priority.

use std::collections::HashMap;

use ratatui::style::Color;

/// An `(input glyph, action label)` hint such as `("a", "launch")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpPrompt {
    pub glyph: String,
    pub action: String,
}

impl HelpPrompt {
    pub fn new(glyph: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            glyph: glyph.into(),
            action: action.into(),
        }
    }
}

impl<G: Into<String>, A: Into<String>> From<(G, A)> for HelpPrompt {
    fn from((glyph, action): (G, A)) -> Self {
        Self::new(glyph, action)
    }
}

/// Where and how the help bar is drawn. A screen may supply its own style;
/// the theme provides the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpStyle {
    pub glyph_fg: Color,
    pub text_fg: Color,
    pub bg: Option<Color>,
    /// Rows from the bottom of the frame.
    pub bottom_offset: u16,
}

impl Default for HelpStyle {
    fn default() -> Self {
        Self {
            glyph_fg: crate::theme::accent(),
            text_fg: Color::Gray,
            bg: None,
            bottom_offset: 0,
        }
    }
}

/// Display priority; glyphs absent from this list sort after all of them.
const PRIORITY: [&str; 11] = [
    "up/down/left/right",
    "up/down",
    "left/right",
    "a",
    "b",
    "x",
    "y",
    "l",
    "r",
    "start",
    "select",
];

const UP: u8 = 0b0001;
const DOWN: u8 = 0b0010;
const LEFT: u8 = 0b0100;
const RIGHT: u8 = 0b1000;

/// Parse a glyph such as `"up/down"` into a direction set. Returns `None`
/// for anything that is not purely directional.
fn directions(glyph: &str) -> Option<u8> {
    let mut set = 0;
    for part in glyph.split('/') {
        set |= match part {
            "up" => UP,
            "down" => DOWN,
            "left" => LEFT,
            "right" => RIGHT,
            _ => return None,
        };
    }
    Some(set)
}

/// Only these unions have a combined glyph of their own.
fn combined_glyph(set: u8) -> Option<&'static str> {
    match set {
        s if s == UP | DOWN => Some("up/down"),
        s if s == LEFT | RIGHT => Some("left/right"),
        s if s == UP | DOWN | LEFT | RIGHT => Some("up/down/left/right"),
        _ => None,
    }
}

fn priority(glyph: &str) -> usize {
    PRIORITY
        .iter()
        .position(|p| *p == glyph)
        .unwrap_or(PRIORITY.len())
}

/// Deduplicate, merge and order raw prompts for display.
pub fn aggregate<I>(prompts: I) -> Vec<HelpPrompt>
where
    I: IntoIterator<Item = HelpPrompt>,
{
    let mut out: Vec<HelpPrompt> = Vec::new();
    let mut glyphs_seen: Vec<String> = Vec::new();
    // action label -> index in `out` of the first entry emitting it
    let mut action_seen: HashMap<String, usize> = HashMap::new();

    for prompt in prompts {
        if glyphs_seen.contains(&prompt.glyph) {
            continue;
        }
        glyphs_seen.push(prompt.glyph.clone());

        let Some(&idx) = action_seen.get(&prompt.action) else {
            action_seen.insert(prompt.action.clone(), out.len());
            out.push(prompt);
            continue;
        };

        let merged = directions(&out[idx].glyph)
            .zip(directions(&prompt.glyph))
            .and_then(|(earlier, later)| combined_glyph(earlier | later));
        // A merge whose union equals the earlier glyph is already covered.
        match merged {
            Some(glyph) => out[idx].glyph = glyph.to_string(),
            None => out.push(prompt),
        }
    }

    out.sort_by_key(|p| priority(&p.glyph));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompts(list: &[(&str, &str)]) -> Vec<HelpPrompt> {
        list.iter().map(|&(g, a)| HelpPrompt::new(g, a)).collect()
    }

    #[test]
    fn single_directions_merge_into_pair() {
        let out = aggregate(prompts(&[("up", "move"), ("down", "move")]));
        assert_eq!(out, prompts(&[("up/down", "move")]));
    }

    #[test]
    fn complementary_pairs_merge_into_dpad() {
        let out = aggregate(prompts(&[("left/right", "move"), ("up/down", "move")]));
        assert_eq!(out, prompts(&[("up/down/left/right", "move")]));
    }

    #[test]
    fn non_dpad_glyphs_sharing_an_action_stay_separate() {
        let out = aggregate(prompts(&[("b", "accept"), ("a", "accept")]));
        assert_eq!(out, prompts(&[("a", "accept"), ("b", "accept")]));
    }

    #[test]
    fn superset_direction_glyph_absorbs_the_pair() {
        let out = aggregate(prompts(&[("left/right", "move"), ("up/down/left/right", "move")]));
        assert_eq!(out, prompts(&[("up/down/left/right", "move")]));
    }

    #[test]
    fn duplicate_glyphs_keep_first_action() {
        let out = aggregate(prompts(&[("a", "launch"), ("a", "select")]));
        assert_eq!(out, prompts(&[("a", "launch")]));
    }

    #[test]
    fn partial_direction_unions_are_not_merged() {
        let out = aggregate(prompts(&[("up/down", "scroll"), ("left", "scroll")]));
        assert_eq!(out, prompts(&[("up/down", "scroll"), ("left", "scroll")]));
    }

    #[test]
    fn unknown_glyphs_sort_last_in_input_order() {
        let out = aggregate(prompts(&[
            ("hotkey", "menu"),
            ("select", "options"),
            ("f1", "help"),
            ("a", "ok"),
            ("up/down", "choose"),
        ]));
        let glyphs: Vec<&str> = out.iter().map(|p| p.glyph.as_str()).collect();
        assert_eq!(glyphs, ["up/down", "a", "select", "hotkey", "f1"]);
    }
}
