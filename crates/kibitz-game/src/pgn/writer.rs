//! PGN export.

use kibitz_core::{Color, Move, Position};

use crate::comments::Comments;
use crate::headers::{Headers, escape};
use crate::pgn::PgnWriteOptions;

fn with_comment(text: String, comments: &Comments, position: &Position) -> String {
    match comments.get(&position.fen()) {
        Some(comment) if text.is_empty() => format!("{{{comment}}}"),
        Some(comment) => format!("{text} {{{comment}}}"),
        None => text,
    }
}

/// Movetext units: one per full move (`"3. Nf3 Nc6"`), comments included,
/// then the result.
fn movetext(
    headers: &Headers,
    mut position: Position,
    moves: &[Move],
    comments: &Comments,
) -> Vec<String> {
    let mut units = Vec::new();
    let mut current = String::new();

    for (ply, &mv) in moves.iter().enumerate() {
        current = with_comment(current, comments, &position);
        if ply == 0 && mv.color == Color::Black {
            let prefix = format!("{}. ...", position.fullmove_number());
            current = if current.is_empty() {
                prefix
            } else {
                format!("{current} {prefix}")
            };
        } else if mv.color == Color::White {
            if !current.is_empty() {
                units.push(std::mem::take(&mut current));
            }
            current = format!("{}.", position.fullmove_number());
        }
        let san = position.move_to_san(mv);
        current.push(' ');
        current.push_str(&san);
        position.make_move(mv);
    }

    let last = with_comment(current, comments, &position);
    if !last.is_empty() {
        units.push(last);
    }
    if let Some(result) = headers.get("Result") {
        units.push(result.to_string());
    }
    units
}

fn strip_space(out: &mut Vec<String>) -> bool {
    if out.last().is_some_and(|s| s == " ") {
        out.pop();
        true
    } else {
        false
    }
}

/// Lay out a unit containing a comment word by word.
fn wrap_comment(
    out: &mut Vec<String>,
    mut width: usize,
    unit: &str,
    options: &PgnWriteOptions,
) -> usize {
    for word in unit.split(' ').filter(|w| !w.is_empty()) {
        if width + word.len() > options.max_width {
            while strip_space(out) {
                width = width.saturating_sub(1);
            }
            out.push(options.newline.clone());
            width = 0;
        }
        out.push(word.to_string());
        out.push(" ".to_string());
        width += word.len() + 1;
    }
    if strip_space(out) {
        width = width.saturating_sub(1);
    }
    width
}

fn wrap(units: &[String], options: &PgnWriteOptions) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut width = 0;
    for (i, unit) in units.iter().enumerate() {
        let separator = usize::from(i != 0);
        let overflows = width + separator + unit.len() > options.max_width;
        if overflows && unit.contains('{') {
            if separator == 1 {
                out.push(" ".to_string());
                width += 1;
            }
            width = wrap_comment(&mut out, width, unit, options);
            continue;
        }
        if overflows && i != 0 {
            strip_space(&mut out);
            out.push(options.newline.clone());
            width = 0;
        } else if i != 0 {
            out.push(" ".to_string());
            width += 1;
        }
        out.push(unit.clone());
        width += unit.len();
    }
    out.concat()
}

/// Render a game that starts at `start` (with empty history) and plays `moves`.
pub(crate) fn write(
    headers: &Headers,
    start: Position,
    moves: &[Move],
    comments: &Comments,
    options: &PgnWriteOptions,
) -> String {
    let newline = &options.newline;
    let mut out = String::new();
    for (name, value) in headers.ordered() {
        out.push_str(&format!("[{name} \"{}\"]{newline}", escape(value)));
    }
    if !headers.is_empty() && !moves.is_empty() {
        out.push_str(newline);
    }

    let units = movetext(headers, start, moves, comments);
    if options.max_width == 0 {
        out.push_str(&units.join(" "));
    } else {
        out.push_str(&wrap(&units, options));
    }
    out
}
