//! SVG line chart of a symbol's close prices with trade markers.

use crate::domain::position::TradeResult;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;
use std::fmt::Write;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const PADDING: f64 = 50.0;

struct Scale {
    min: f64,
    scale_x: f64,
    scale_y: f64,
}

impl Scale {
    fn new(series: &PriceSeries) -> Self {
        let closes = series.closes();
        let min = closes.iter().copied().fold(f64::INFINITY, f64::min);
        let max = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let plot_width = WIDTH - 2.0 * PADDING;
        let plot_height = HEIGHT - 2.0 * PADDING;
        let range = max - min;
        let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
        let scale_x = if closes.len() > 1 {
            plot_width / (closes.len() - 1) as f64
        } else {
            0.0
        };
        Self {
            min,
            scale_x,
            scale_y,
        }
    }

    fn x(&self, index: usize) -> f64 {
        PADDING + index as f64 * self.scale_x
    }

    fn y(&self, value: f64) -> f64 {
        HEIGHT - PADDING - (value - self.min) * self.scale_y
    }
}

/// Renders the close-price line. Buy points are drawn green, sell points red.
/// An empty series yields a chart with a "no data" caption.
pub fn render_price_chart(symbol: &str, series: &PriceSeries, trades: &[TradeResult]) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH:.0}" height="{HEIGHT:.0}" viewBox="0 0 {WIDTH:.0} {HEIGHT:.0}">"#
    );
    svg.push_str(r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = write!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" text-anchor="middle" font-family="sans-serif" font-size="16">{} Close Price</text>"#,
        WIDTH / 2.0,
        PADDING / 2.0,
        escape(symbol)
    );
    // axes
    let _ = write!(
        svg,
        r#"<line x1="{p:.0}" y1="{p:.0}" x2="{p:.0}" y2="{b:.0}" stroke="black"/><line x1="{p:.0}" y1="{b:.0}" x2="{r:.0}" y2="{b:.0}" stroke="black"/>"#,
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING
    );

    if series.is_empty() {
        let _ = write!(
            svg,
            r#"<text x="{:.0}" y="{:.0}" text-anchor="middle" font-family="sans-serif" font-size="12">No data</text>"#,
            WIDTH / 2.0,
            HEIGHT / 2.0
        );
        svg.push_str("</svg>");
        return svg;
    }

    let scale = Scale::new(series);
    let points: Vec<String> = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:.1},{:.1}", scale.x(i), scale.y(p.close)))
        .collect();
    let _ = write!(
        svg,
        r#"<polyline fill="none" stroke="steelblue" stroke-width="1.5" points="{}"/>"#,
        points.join(" ")
    );

    for trade in trades {
        marker(&mut svg, series, &scale, trade.buy_date, trade.buy_price, "green");
        if let (Some(date), Some(price)) = (trade.sell_date, trade.sell_price) {
            marker(&mut svg, series, &scale, date, price, "red");
        }
    }

    axis_labels(&mut svg, series, &scale);
    svg.push_str("</svg>");
    svg
}

fn marker(svg: &mut String, series: &PriceSeries, scale: &Scale, date: NaiveDate, price: f64, color: &str) {
    let Ok(index) = series.points().binary_search_by_key(&date, |p| p.date) else {
        return;
    };
    let _ = write!(
        svg,
        r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="{color}"/>"#,
        scale.x(index),
        scale.y(price)
    );
}

fn axis_labels(svg: &mut String, series: &PriceSeries, scale: &Scale) {
    let points = series.points();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return;
    };
    let max = series.closes().into_iter().fold(f64::NEG_INFINITY, f64::max);
    let label_y = HEIGHT - PADDING + 16.0;

    let _ = write!(
        svg,
        r#"<text x="{:.0}" y="{label_y:.0}" font-family="sans-serif" font-size="10">{}</text>"#,
        PADDING,
        first.date
    );
    let _ = write!(
        svg,
        r#"<text x="{:.0}" y="{label_y:.0}" text-anchor="end" font-family="sans-serif" font-size="10">{}</text>"#,
        WIDTH - PADDING,
        last.date
    );
    for value in [scale.min, max] {
        let _ = write!(
            svg,
            r#"<text x="{:.0}" y="{:.1}" text-anchor="end" font-family="sans-serif" font-size="10">{:.2}</text>"#,
            PADDING - 4.0,
            scale.y(value) + 3.0,
            value
        );
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
