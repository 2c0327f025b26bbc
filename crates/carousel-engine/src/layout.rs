//! Slide text layout.
//!
//! Splits `*emphasis*` markup into runs, greedily word-wraps the de-marked
//! text, shrinks the font until the block fits its box, and computes
//! safe horizontal anchors for right-to-left lines.

use std::ops::Range;

use tracing::debug;
use unicode_bidi::{BidiInfo, Direction, Level, get_base_direction};

use crate::text::TextMeasure;
use crate::{CANVAS_HEIGHT, CANVAS_WIDTH, MARGIN};

/// Font size at which the shrink-to-fit search starts by default.
pub const DEFAULT_START_FONT_SIZE: f32 = 95.0;

/// Font size at which the shrink-to-fit search gives up.
pub const DEFAULT_MIN_FONT_SIZE: f32 = 40.0;

/// Amount the font size is reduced by on each failed fit.
pub const FONT_SIZE_STEP: f32 = 5.0;

/// Largest font size accepted for body or headline text.
pub const MAX_FONT_SIZE: f32 = 500.0;

/// Inter-line spacing as a fraction of the font size.
pub const LINE_SPACING_RATIO: f32 = 0.3;

/// A contiguous piece of text with a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub is_emphasis: bool,
}

impl TextRun {
    pub fn new(text: impl Into<String>, is_emphasis: bool) -> Self {
        Self {
            text: text.into(),
            is_emphasis,
        }
    }
}

/// One wrapped line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Runs in logical order.
    pub runs: Vec<TextRun>,
    /// Total advance width with each run measured at its own size.
    pub width: f32,
    /// Tallest font size used on the line.
    pub height: f32,
    /// First strong character is right-to-left.
    pub rtl: bool,
}

impl TextLine {
    /// The line's text with markup removed.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Result of laying out one slide's text.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideLayout {
    pub lines: Vec<TextLine>,
    /// Chosen size for default runs.
    pub font_size: f32,
    /// Size for emphasis runs.
    pub emphasis_size: f32,
    pub line_spacing: f32,
    pub total_height: f32,
    /// The minimum size was reached and the block is still too tall.
    pub overflow: bool,
}

impl SlideLayout {
    /// Font size used for `run`.
    pub fn run_size(&self, run: &TextRun) -> f32 {
        if run.is_emphasis {
            self.emphasis_size
        } else {
            self.font_size
        }
    }
}

/// Box and font-size bounds for [`layout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub max_width: f32,
    pub max_height: f32,
    pub min_font_size: f32,
    pub start_font_size: f32,
    /// Fixed size for emphasis runs; `None` follows the fitted body size.
    pub headline_font_size: Option<f32>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_width: CANVAS_WIDTH as f32 - MARGIN as f32 * 2.5,
            max_height: CANVAS_HEIGHT as f32 * 0.5,
            min_font_size: DEFAULT_MIN_FONT_SIZE,
            start_font_size: DEFAULT_START_FONT_SIZE,
            headline_font_size: None,
        }
    }
}

/// Split `text` on `*` into alternating default/emphasis runs.
///
/// Even-indexed segments are default, odd-indexed are emphasis; empty
/// segments are dropped and an unmatched `*` just ends its segment.
pub fn segment_emphasis(text: &str) -> Vec<TextRun> {
    text.split('*')
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, part)| TextRun::new(part, i % 2 == 1))
        .collect()
}

/// Lay out `text` at the largest font size that fits `opts`.
///
/// A block fits when its height is within `max_height` and no line is wider
/// than `max_width`. Never fails: empty text yields one empty line, and text
/// that cannot fit is returned at the minimum size with `overflow` set.
pub fn layout<M: TextMeasure + ?Sized>(
    text: &str,
    opts: &LayoutOptions,
    measure: &M,
) -> SlideLayout {
    let marked = mark_emphasis(text);

    let start_size = clamp_font_size(opts.start_font_size, DEFAULT_START_FONT_SIZE);
    let min_size = clamp_font_size(opts.min_font_size, DEFAULT_MIN_FONT_SIZE).min(start_size);
    let emphasis_size = opts
        .headline_font_size
        .map(|size| clamp_font_size(size, start_size));
    let steps = ((start_size - min_size) / FONT_SIZE_STEP).ceil() as u32;

    let mut step = 0;
    loop {
        let size = (start_size - step as f32 * FONT_SIZE_STEP).max(min_size);
        let attempt = layout_at(&marked, size, emphasis_size, opts, measure);
        let fits = attempt.total_height <= opts.max_height
            && attempt.lines.iter().all(|l| l.width <= opts.max_width);
        if fits || step >= steps {
            debug!(
                font_size = attempt.font_size,
                lines = attempt.lines.len(),
                total_height = attempt.total_height,
                overflow = !fits,
                "Slide text laid out"
            );
            return SlideLayout {
                overflow: !fits,
                ..attempt
            };
        }
        step += 1;
    }
}

/// Keep a requested size within `[1, MAX_FONT_SIZE]`; non-finite sizes
/// become `fallback`.
fn clamp_font_size(size: f32, fallback: f32) -> f32 {
    if size.is_finite() {
        size.clamp(1.0, MAX_FONT_SIZE)
    } else {
        fallback
    }
}

/// Right edge for a line of `width` centered on `center_x`, clamped so the
/// line stays inside `[margin, canvas_width - margin]`.
///
/// Lines wider than the safe zone are centered within it.
pub fn anchor_line(width: f32, center_x: f32, canvas_width: f32, margin: f32) -> f32 {
    let left_bound = margin;
    let right_bound = canvas_width - margin;

    let mut right = center_x + width / 2.0;
    if right > right_bound {
        right = right_bound;
    }
    if right - width < left_bound {
        right = left_bound + width;
    }
    if right > right_bound {
        right = (left_bound + right_bound) / 2.0 + width / 2.0;
    }
    right
}

/// Whether the first strong character of `text` is right-to-left.
pub fn is_rtl_text(text: &str) -> bool {
    get_base_direction(text) == Direction::Rtl
}

/// Reorder a logical run into left-to-right drawing order with the Unicode
/// bidi algorithm, resolved against an RTL or LTR base direction.
pub fn visual_order(run: &str, rtl: bool) -> String {
    if run.is_empty() {
        return String::new();
    }
    let base = if rtl { Level::rtl() } else { Level::ltr() };
    let info = BidiInfo::new(run, Some(base));
    info.paragraphs
        .iter()
        .map(|para| info.reorder_line(para, para.range.clone()))
        .collect()
}

fn mark_emphasis(text: &str) -> Vec<(char, bool)> {
    text.split('*')
        .enumerate()
        .flat_map(|(i, part)| part.chars().map(move |ch| (ch, i % 2 == 1)))
        .collect()
}

fn layout_at<M: TextMeasure + ?Sized>(
    marked: &[(char, bool)],
    size: f32,
    emphasis_size: Option<f32>,
    opts: &LayoutOptions,
    measure: &M,
) -> SlideLayout {
    let sizes = RunSizes {
        body: size,
        emphasis: emphasis_size.unwrap_or(size),
    };
    let line_spacing = (size * LINE_SPACING_RATIO).floor();

    let lines: Vec<TextLine> = wrap(marked, sizes, opts.max_width, measure)
        .into_iter()
        .map(|range| build_line(&marked[range], sizes, measure))
        .collect();

    let gaps = lines.len().saturating_sub(1) as f32;
    let total_height = lines.iter().map(|l| l.height).sum::<f32>() + gaps * line_spacing;

    SlideLayout {
        lines,
        font_size: sizes.body,
        emphasis_size: sizes.emphasis,
        line_spacing,
        total_height,
        overflow: false,
    }
}

#[derive(Debug, Clone, Copy)]
struct RunSizes {
    body: f32,
    emphasis: f32,
}

impl RunSizes {
    fn of(&self, is_emphasis: bool) -> f32 {
        if is_emphasis { self.emphasis } else { self.body }
    }
}

/// Greedy word wrap over `\n`-separated paragraphs of space-separated words.
///
/// Candidates are measured run by run at their own sizes, the same way
/// finished lines are.
fn wrap<M: TextMeasure + ?Sized>(
    marked: &[(char, bool)],
    sizes: RunSizes,
    max_width: f32,
    measure: &M,
) -> Vec<Range<usize>> {
    let mut lines = Vec::new();

    for paragraph in split_ranges(marked, 0..marked.len(), '\n') {
        let mut current: Option<Range<usize>> = None;
        for word in split_ranges(marked, paragraph.clone(), ' ') {
            let candidate = match &current {
                Some(line) => line.start..word.end,
                None => word.clone(),
            };
            let fits = || {
                let runs = group_runs(&marked[candidate.clone()]);
                marked_width(&runs, sizes, measure) <= max_width
            };
            if current.is_none() || fits() {
                current = Some(candidate);
            } else if let Some(line) = current.replace(word) {
                lines.push(line);
            }
        }
        lines.push(current.unwrap_or(paragraph.start..paragraph.start));
    }

    lines
}

fn split_ranges(marked: &[(char, bool)], range: Range<usize>, sep: char) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start = range.start;
    for i in range.clone() {
        if marked[i].0 == sep {
            out.push(start..i);
            start = i + 1;
        }
    }
    out.push(start..range.end);
    out
}

fn group_runs(marked: &[(char, bool)]) -> Vec<TextRun> {
    let mut runs: Vec<TextRun> = Vec::new();
    for &(ch, is_emphasis) in marked {
        match runs.last_mut() {
            Some(run) if run.is_emphasis == is_emphasis => run.text.push(ch),
            _ => runs.push(TextRun::new(ch.to_string(), is_emphasis)),
        }
    }
    runs
}

fn marked_width<M: TextMeasure + ?Sized>(
    runs: &[TextRun],
    sizes: RunSizes,
    measure: &M,
) -> f32 {
    runs.iter()
        .map(|r| measure.text_width(&r.text, sizes.of(r.is_emphasis)))
        .sum()
}

fn build_line<M: TextMeasure + ?Sized>(
    marked: &[(char, bool)],
    sizes: RunSizes,
    measure: &M,
) -> TextLine {
    let runs = group_runs(marked);
    let width = marked_width(&runs, sizes, measure);
    let height = runs
        .iter()
        .map(|r| sizes.of(r.is_emphasis))
        .fold(sizes.body, f32::max);
    let plain: String = runs.iter().map(|r| r.text.as_str()).collect();

    TextLine {
        rtl: is_rtl_text(&plain),
        runs,
        width,
        height,
    }
}
