//! Status bar widget - waveform, gain, voices and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use saavy_keys::{RingOutput, Session};

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = saavy_keys::dsp::amplify::peak(buffer);
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Render the status bar
pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    session: &Session<RingOutput>,
    sample_rate: f32,
    stats: &AudioStats,
    notice: Option<&str>,
) {
    let block = Block::default().title(" saavy-keys ").borders(Borders::ALL);

    let tone = session.tone();
    let voices = session.voices().live_count();

    let mut spans = vec![
        Span::styled(
            format!(" Wave: {:<8} ", tone.kind()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Gain: {:>3.0}%  ", tone.current_gain() * 100.0),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("Voices: {}  ", voices),
            Style::default().fg(if voices > 0 { Color::Green } else { Color::White }),
        ),
        Span::styled(
            format!("{:.1}kHz  ", sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ];
    if let Some(notice) = notice {
        spans.push(Span::styled(
            format!("  {}", notice),
            Style::default().fg(Color::Red),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
