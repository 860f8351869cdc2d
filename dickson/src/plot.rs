//! Static SVG scatter charts.
//!
//! The charts are written out as standalone SVG, so nothing beyond `std` is
//! needed to draw them. See [`indices_chart`] and [`cardinality_chart`] for
//! the two kinds of charts the data is shown in.

use std::fmt::{Display, Write as _};
use std::path::Path;

use crate::error::{Error, Result};
use crate::pattern::{IndexMap, Label, Pattern, classify};
use crate::table::Record;

const WIDTH: f64 = 800.;
const HEIGHT: f64 = 500.;
const MARGIN_LEFT: f64 = 70.;
const MARGIN_RIGHT: f64 = 180.;
const MARGIN_TOP: f64 = 40.;
const MARGIN_BOTTOM: f64 = 50.;

/// Colors of the series, in order. They repeat after the last one.
const COLORS: [&str; 5] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd"];

/// A named set of points.
#[derive(Clone, Debug)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// A scatter chart with linear axes.
#[derive(Clone, Debug)]
pub struct Scatter {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl Scatter {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            series: Vec::new(),
        }
    }

    /// Adds a series. Empty series are kept, they show up in the legend.
    pub fn add_series(&mut self, name: impl Into<String>, points: Vec<(f64, f64)>) {
        self.series.push(Series { name: name.into(), points });
    }

    /// The total number of points.
    pub fn num_points(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Returns a struct that formats the chart as SVG.
    pub fn svg(&self) -> Svg<'_> {
        Svg(self)
    }

    /// Writes the chart to an SVG file.
    /// Missing parent directories are created.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        std::fs::write(path, self.svg().to_string()).map_err(|e| Error::io(path, e))
    }

    fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let points = || self.series.iter().flat_map(|s| s.points.iter());
        let range = |it: &mut dyn Iterator<Item = f64>| {
            let (lo, hi) = it.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
            if lo > hi {
                (0., 1.)
            } else if lo == hi {
                (lo - 1., hi + 1.)
            } else {
                (lo, hi)
            }
        };
        (
            range(&mut points().map(|p| p.0)),
            range(&mut points().map(|p| p.1)),
        )
    }
}

/// Roughly `target` tick positions covering `lo..=hi`, at multiples of 1, 2
/// or 5 times a power of ten.
fn ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    let raw = (hi - lo) / target as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let step = [1., 2., 5., 10.]
        .into_iter()
        .map(|m| m * mag)
        .find(|&s| s >= raw)
        .unwrap_or(10. * mag);

    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Escapes text for use in SVG.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

pub struct Svg<'a>(&'a Scatter);

impl Display for Svg<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let chart = self.0;
        let ((x_lo, x_hi), (y_lo, y_hi)) = chart.bounds();

        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let sx = |x: f64| MARGIN_LEFT + (x - x_lo) / (x_hi - x_lo) * plot_w;
        let sy = |y: f64| MARGIN_TOP + plot_h - (y - y_lo) / (y_hi - y_lo) * plot_h;

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" font-family="sans-serif" font-size="12">"#
        )?;
        writeln!(f, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            f,
            r#"<text x="{}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.,
            escape(&chart.title)
        )?;

        // Grid and tick labels.
        let bottom = MARGIN_TOP + plot_h;
        let right = MARGIN_LEFT + plot_w;
        for x in ticks(x_lo, x_hi, 8) {
            let px = sx(x);
            writeln!(
                f,
                r##"<line x1="{px:.1}" y1="{MARGIN_TOP}" x2="{px:.1}" y2="{bottom}" stroke="#ddd"/>"##
            )?;
            writeln!(
                f,
                r#"<text x="{px:.1}" y="{}" text-anchor="middle">{x}</text>"#,
                bottom + 16.
            )?;
        }
        for y in ticks(y_lo, y_hi, 6) {
            let py = sy(y);
            writeln!(
                f,
                r##"<line x1="{MARGIN_LEFT}" y1="{py:.1}" x2="{right}" y2="{py:.1}" stroke="#ddd"/>"##
            )?;
            writeln!(
                f,
                r#"<text x="{}" y="{:.1}" text-anchor="end">{y}</text>"#,
                MARGIN_LEFT - 6.,
                py + 4.
            )?;
        }

        // Axes.
        writeln!(
            f,
            r#"<rect x="{MARGIN_LEFT}" y="{MARGIN_TOP}" width="{plot_w}" height="{plot_h}" fill="none" stroke="black"/>"#
        )?;
        writeln!(
            f,
            r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.,
            HEIGHT - 10.,
            escape(&chart.x_label)
        )?;
        writeln!(
            f,
            r#"<text x="16" y="{0}" text-anchor="middle" transform="rotate(-90 16 {0})">{1}</text>"#,
            MARGIN_TOP + plot_h / 2.,
            escape(&chart.y_label)
        )?;

        // Points and legend.
        for (i, series) in chart.series.iter().enumerate() {
            let color = COLORS[i % COLORS.len()];
            let mut markers = String::new();
            for &(x, y) in &series.points {
                write!(
                    markers,
                    r#"<circle cx="{:.1}" cy="{:.1}" r="3"/>"#,
                    sx(x),
                    sy(y)
                )?;
            }
            writeln!(f, r#"<g fill="{color}" fill-opacity="0.7">{markers}</g>"#)?;

            let ly = MARGIN_TOP + 10. + 18. * i as f64;
            writeln!(
                f,
                r#"<rect x="{}" y="{}" width="10" height="10" fill="{color}"/>"#,
                right + 15.,
                ly - 9.
            )?;
            writeln!(
                f,
                r#"<text x="{}" y="{ly}">{}</text>"#,
                right + 30.,
                escape(&series.name)
            )?;
        }

        f.write_str("</svg>\n")
    }
}

/// The chart p -> n of the cardinality-2 indices, one series per pattern
/// and one for the indices that match none.
pub fn indices_chart(groups: &IndexMap) -> Scatter {
    let labels: Vec<Label> = Pattern::ALL
        .iter()
        .map(|&p| Label::Pattern(p))
        .chain([Label::Residual])
        .collect();
    let mut points = vec![Vec::new(); labels.len()];

    for (&p, ns) in groups {
        for (n, label) in classify(p, ns) {
            if let Some(i) = labels.iter().position(|&l| l == label) {
                points[i].push((p as f64, n as f64));
            }
        }
    }

    let mut chart = Scatter::new(
        "Indices n with exactly two values",
        "Prime p",
        "Index n",
    );
    for (label, points) in labels.into_iter().zip(points) {
        let name = match label {
            Label::Pattern(pattern) => format!("n = {}", pattern.formula()),
            Label::Residual => "Other".to_owned(),
        };
        chart.add_series(name, points);
    }
    chart
}

/// The chart n -> cardinality for the prime `p`.
pub fn cardinality_chart(p: u64, records: &[Record]) -> Scatter {
    let points = records
        .iter()
        .filter(|r| r.p == p)
        .map(|r| (r.n as f64, r.value_count as f64))
        .collect();
    let mut chart = Scatter::new(
        format!("Cardinality vs. index n for p = {p}"),
        "Index n",
        "Cardinality of the value set",
    );
    chart.add_series(format!("p = {p}"), points);
    chart
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pattern::cardinality_two_indices;
    use crate::table;

    #[test]
    fn nice_ticks() {
        assert_eq!(ticks(0., 10., 5), [0., 2., 4., 6., 8., 10.]);
        assert_eq!(ticks(3., 97., 8), [20., 40., 60., 80.]);
        assert_eq!(ticks(0.5, 1.5, 2), [0.5, 1., 1.5]);
    }

    #[test]
    fn one_marker_per_point() {
        let records = table::generate(&[3, 5, 7, 11]).unwrap();
        let groups = cardinality_two_indices(&records);
        let chart = indices_chart(&groups);
        assert_eq!(chart.series.len(), 4);
        assert_eq!(chart.num_points(), 4 + 3 + 3 + 3);
        // Each pattern claims one index of p = 3, the fourth is left over.
        assert_eq!(chart.series[3].points, [(3., 8.)]);

        let svg = chart.svg().to_string();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), chart.num_points());
        assert!(svg.contains("n = (p^2 + 2p - 1)/2"));

        let chart = cardinality_chart(5, &records);
        assert_eq!(chart.svg().to_string().matches("<circle").count(), 25);
    }

    #[test]
    fn escapes_text() {
        let chart = Scatter::new("a < b & c", "x", "y");
        let svg = chart.svg().to_string();
        assert!(svg.contains("a &lt; b &amp; c"));
        assert_eq!(svg.matches("<circle").count(), 0);
    }
}
