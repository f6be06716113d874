/// Folds full-width ASCII (U+FF01..=U+FF5E) to its half-width form and the
/// ideographic space (U+3000) to a plain space. Stored search names and
/// search needles both pass through this fold so matching ignores the input
/// width of letters and digits.
pub fn fold_width(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{3000}' => ' ',
            '\u{ff01}'..='\u{ff5e}' => char::from_u32(c as u32 - 0xfee0).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// True when nothing searchable is left after folding and trimming.
pub fn folded_is_empty(input: &str) -> bool {
    fold_width(input).trim().is_empty()
}
