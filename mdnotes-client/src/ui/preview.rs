use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::markdown::{self, Block, Cell, PLACEHOLDER, Preview};

const RULE_WIDTH: usize = 40;

/// Turn a preview into styled terminal lines.
pub fn preview_lines(preview: &Preview) -> Vec<Line<'static>> {
    match preview {
        Preview::Placeholder => vec![Line::styled(
            format!("✨ {PLACEHOLDER}"),
            Style::default().fg(Color::DarkGray),
        )],
        Preview::Document(blocks) => blocks_lines(blocks),
    }
}

fn blocks_lines(blocks: &[Block]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.extend(block_lines(block));
    }
    lines
}

fn heading_style(level: u8) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    match level {
        1 => style.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
        2 => style.fg(Color::Blue),
        3 => style.fg(Color::Magenta),
        _ => style,
    }
}

fn block_lines(block: &Block) -> Vec<Line<'static>> {
    match block {
        Block::Heading { level, spans } => inline_lines(spans, heading_style(*level)),
        Block::Paragraph(spans) => inline_lines(spans, Style::default()),
        Block::List { start, items } => {
            let mut lines = Vec::new();
            for (i, item) in items.iter().enumerate() {
                let marker = start.map_or_else(
                    || "• ".to_string(),
                    |start| format!("{}. ", start + i as u64),
                );
                let indent = " ".repeat(marker.chars().count());
                // items are tight, no blank lines between their blocks
                let body: Vec<Line<'static>> = item.iter().flat_map(block_lines).collect();
                lines.extend(prefixed(body, &marker, &indent, Style::default()));
            }
            lines
        }
        Block::CodeBlock { code, .. } => {
            let style = Style::default().fg(Color::Green).bg(Color::Black);
            code.lines()
                .map(|line| Line::from(Span::styled(format!("  {line}"), style)))
                .collect()
        }
        Block::BlockQuote(inner) => {
            let style = Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC);
            let body = blocks_lines(inner)
                .into_iter()
                .map(|line| line.patch_style(style))
                .collect();
            prefixed(body, "│ ", "│ ", Style::default().fg(Color::Blue))
        }
        Block::Rule => vec![Line::styled(
            "─".repeat(RULE_WIDTH),
            Style::default().fg(Color::DarkGray),
        )],
        Block::Table { header, rows } => table_lines(header, rows),
    }
}

fn span_style(span: &markdown::Span, base: Style) -> Style {
    let mut style = base;
    if span.style.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if span.style.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if span.style.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if span.style.code {
        style = style.fg(Color::Green).bg(Color::Black);
    }
    if span.link.is_some() {
        style = style.fg(Color::Blue).add_modifier(Modifier::UNDERLINED);
    }
    style
}

/// Spans to lines, breaking at hard line breaks.
fn inline_lines(spans: &[markdown::Span], base: Style) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for span in spans {
        let style = span_style(span, base);
        let mut parts = span.text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                current.push(Span::styled(part.to_string(), style));
            }
            if parts.peek().is_some() {
                lines.push(Line::from(std::mem::take(&mut current)));
            }
        }
        if span.link.as_ref().is_some_and(|link| link.opens_new_context) {
            current.push(Span::styled(" ↗", Style::default().fg(Color::DarkGray)));
        }
    }

    lines.push(Line::from(current));
    lines
}

fn prefixed(
    lines: Vec<Line<'static>>,
    first: &str,
    rest: &str,
    style: Style,
) -> Vec<Line<'static>> {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, mut line)| {
            let prefix = if i == 0 { first } else { rest };
            line.spans.insert(0, Span::styled(prefix.to_string(), style));
            line
        })
        .collect()
}

fn table_lines(header: &[Cell], rows: &[Vec<Cell>]) -> Vec<Line<'static>> {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let text = |row: &[Cell], col: usize| {
        row.get(col)
            .map(|cell| markdown::plain_text(cell))
            .unwrap_or_default()
    };

    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            std::iter::once(header)
                .chain(rows.iter().map(Vec::as_slice))
                .map(|row| text(row, col).chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render_row = |row: &[Cell], style: Style| {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(col, width)| format!("{:<width$}", text(row, col), width = *width))
            .collect();
        Line::styled(format!("│ {} │", cells.join(" │ ")), style)
    };

    let separator = widths
        .iter()
        .map(|width| "─".repeat(width + 2))
        .collect::<Vec<_>>()
        .join("┼");

    let mut lines = vec![
        render_row(header, Style::default().add_modifier(Modifier::BOLD)),
        Line::styled(format!("├{separator}┤"), Style::default().fg(Color::DarkGray)),
    ];
    lines.extend(rows.iter().map(|row| render_row(row, Style::default())));
    lines
}
