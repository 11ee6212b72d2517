//! Spectrum widget
//!
//! Hann-windowed FFT of the scope buffer, sampled at log-spaced frequencies
//! and drawn on a log-frequency axis. The fundamentals of the pressed keys
//! are marked on top so the harmonics of each waveform are easy to read.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Number of points on the frequency axis
const SPECTRUM_BINS: usize = 64;
const MIN_HZ: f64 = 50.0;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    /// FFT bin for each display point
    bin_indices: Vec<usize>,
    /// log10 of each display point's frequency
    log_freqs: Vec<f64>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 Hz, dB)
    spectrum: Vec<(f64, f64)>,
    max_hz: f64,
}

impl SpectrumAnalyzer {
    /// `buffer_len` is the FFT size and must match the scope buffer.
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        let denom = buffer_len.saturating_sub(1).max(1) as f32;
        let window = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
            .collect();

        let max_hz = (sample_rate as f64 / 2.0).min(8_000.0).max(MIN_HZ * 2.0);
        let half = (buffer_len / 2).max(1);
        let (log_freqs, bin_indices): (Vec<f64>, Vec<usize>) = (0..SPECTRUM_BINS)
            .map(|i| {
                let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
                let hz = MIN_HZ * (max_hz / MIN_HZ).powf(t);
                let index = (hz * buffer_len as f64 / sample_rate as f64).round() as usize;
                (hz.log10(), index.min(half - 1))
            })
            .unzip();

        let spectrum = log_freqs.iter().map(|&f| (f, FLOOR_DB)).collect();

        Self {
            window,
            bin_indices,
            log_freqs,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
            max_hz,
        }
    }

    /// Recompute from `buffer`. Ignored if the length does not match.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for ((point, &index), &log_hz) in self
            .spectrum
            .iter_mut()
            .zip(&self.bin_indices)
            .zip(&self.log_freqs)
        {
            let power = self.scratch[index].norm_sqr().max(1e-12);
            *point = (log_hz, (10.0 * (power as f64).log10()).max(FLOOR_DB));
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }

    pub fn bounds(&self) -> [f64; 2] {
        [MIN_HZ.log10(), self.max_hz.log10()]
    }
}

/// Render the spectrum with a marker at each pressed key's fundamental.
pub fn render_spectrum(
    frame: &mut Frame,
    area: Rect,
    analyzer: &SpectrumAnalyzer,
    pressed_hz: &[f64],
) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let spectrum = analyzer.data();
    let max_db = spectrum.iter().map(|(_, db)| *db).fold(FLOOR_DB, f64::max);
    let top = max_db.max(0.0) + 10.0;

    let markers: Vec<(f64, f64)> = pressed_hz.iter().map(|hz| (hz.log10(), top)).collect();

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(spectrum),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Cyan))
            .data(&markers),
    ];

    let [lo, hi] = analyzer.bounds();
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([lo, hi])
                .labels(vec![
                    Span::raw(format!("{:.0}", MIN_HZ)),
                    Span::raw(format!("{:.0}", 10f64.powf(hi))),
                ])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, top])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
