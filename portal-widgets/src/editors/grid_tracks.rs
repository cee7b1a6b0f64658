//! Grid track lists (`grid-template-columns` / `grid-template-rows`).

use super::{ControlKind, EditorControl, EditorInput};
use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_TRACK: &str = "1fr";

/// Split a template into tracks. Function tokens such as `repeat(3, 1fr)` or
/// `minmax(100px, 1fr)` stay whole, nested parentheses included. An empty
/// template is a single `1fr` track.
pub fn tokenize_tracks(template: &str) -> Vec<String> {
    let mut tracks = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in template.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tracks.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tracks.push(current);
    }
    if tracks.is_empty() {
        tracks.push(DEFAULT_TRACK.to_string());
    }
    tracks
}

pub fn join_tracks(tracks: &[String]) -> String {
    tracks.join(" ")
}

/// Append a `1fr` track
pub fn add_track(template: &str) -> String {
    let mut tracks = tokenize_tracks(template);
    tracks.push(DEFAULT_TRACK.to_string());
    join_tracks(&tracks)
}

/// Remove the track at `index`. The last remaining track is never removed.
pub fn remove_track(template: &str, index: usize) -> String {
    let mut tracks = tokenize_tracks(template);
    if tracks.len() > 1 && index < tracks.len() {
        tracks.remove(index);
    }
    join_tracks(&tracks)
}

pub fn update_track(template: &str, index: usize, track: &str) -> String {
    let mut tracks = tokenize_tracks(template);
    if let Some(slot) = tracks.get_mut(index) {
        *slot = track.trim().to_string();
    }
    join_tracks(&tracks)
}

/// Number of tracks the template produces, expanding `repeat(n, ...)`.
/// Never less than 1; saturates at `usize::MAX`.
pub fn count_tracks(template: &str) -> usize {
    static REPEAT_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REPEAT_REGEX.get_or_init(|| Regex::new(r"^repeat\(\s*(\d+)\s*,").unwrap());

    let count = tokenize_tracks(template)
        .iter()
        .map(|track| {
            re.captures(track)
                .and_then(|caps| caps[1].parse::<usize>().ok())
                .unwrap_or(1)
        })
        .fold(0usize, usize::saturating_add);
    count.max(1)
}

pub fn grid_template_editor(input: &EditorInput<'_>) -> EditorControl {
    input.control(ControlKind::TrackList {
        tracks: tokenize_tracks(input.str_value()),
    })
}
