//! Stereo oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Render left (cyan) and right (magenta) traces on one chart
pub fn render_scope(frame: &mut Frame, area: Rect, frames: &[(f32, f32)]) {
    let block = Block::default().title(" Output L/R ").borders(Borders::ALL);

    let len = frames.len().max(1) as f64;
    let left: Vec<(f64, f64)> = frames
        .iter()
        .enumerate()
        .map(|(i, &(l, _))| (i as f64 / len, l as f64))
        .collect();
    let right: Vec<(f64, f64)> = frames
        .iter()
        .enumerate()
        .map(|(i, &(_, r))| (i as f64 / len, r as f64))
        .collect();

    let datasets = vec![
        Dataset::default()
            .name("L")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&left),
        Dataset::default()
            .name("R")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(&right),
    ];

    let chart = Chart::new(datasets)
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
