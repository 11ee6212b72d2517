//! Oscilloscope widget, triggered on a rising zero crossing so a held note
//! stands still instead of scrolling.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Start of the first rising zero crossing in the first half of `buffer`.
fn trigger_point(buffer: &[f32]) -> usize {
    let search = buffer.len() / 2;
    buffer
        .windows(2)
        .take(search)
        .position(|w| w[0] <= 0.0 && w[1] > 0.0)
        .unwrap_or(0)
}

/// Render the oscilloscope
pub fn render_scope(frame: &mut Frame, area: Rect, audio_buffer: &[f32]) {
    let block = Block::default().title(" Scope ").borders(Borders::ALL);

    let start = trigger_point(audio_buffer);
    let window = &audio_buffer[start..(start + audio_buffer.len() / 2).min(audio_buffer.len())];

    let data: Vec<(f64, f64)> = window
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / window.len().max(1) as f64, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
