use aisp::AispError;
use ariadne::{Color, Label, Report, ReportKind, Source};

/// Format an AispError against its source with Ariadne
///
/// `source` may be lossily decoded; offsets past the end or inside a
/// multi-byte character snap back to the previous character boundary.
pub fn format_error(error: &AispError, source_id: &str, source: &str) -> String {
    let details = error.details();
    let start = char_index(source, details.offset);
    let end = (start + 1).min(source.chars().count()).max(start);

    let mut report = Report::build(ReportKind::Error, source_id, start)
        .with_message(format!(
            "{} error: {}",
            capitalize(error.code().name()),
            details.message
        ))
        .with_label(
            Label::new((source_id, start..end))
                .with_message(format!("at byte {}", details.offset))
                .with_color(Color::Red),
        );

    if let Some(suggestion) = &details.suggestion {
        report = report.with_help(suggestion);
    }

    let mut output = Vec::new();
    match report
        .finish()
        .write((source_id, Source::from(source)), &mut output)
    {
        Ok(()) => String::from_utf8_lossy(&output).to_string(),
        Err(_) => format!("{}: {}", source_id, error),
    }
}

/// Character index of a byte offset
fn char_index(source: &str, offset: usize) -> usize {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    source[..offset].chars().count()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
