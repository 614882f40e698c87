use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// Closed data range shown along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    /// Smallest visible value.
    pub min: f64,
    /// Largest visible value.
    pub max: f64,
}

impl AxisRange {
    /// Range symmetric around zero.
    pub const fn symmetric(half_width: f64) -> Self {
        Self {
            min: -half_width,
            max: half_width,
        }
    }

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Returns `true` when `value` is finite and inside the range.
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && self.min <= value && value <= self.max
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}

/// Rectangle of the canvas mapped onto a pair of axis ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Left edge in canvas pixels.
    pub left: f64,
    /// Top edge in canvas pixels.
    pub top: f64,
    /// Plot area width in pixels.
    pub width: f64,
    /// Plot area height in pixels.
    pub height: f64,
    /// Horizontal data range.
    pub x_range: AxisRange,
    /// Vertical data range.
    pub y_range: AxisRange,
}

impl Panel {
    /// Shrinks the plot area so one data unit spans the same number of pixels on
    /// both axes, keeping it centred in the original rectangle.
    pub fn with_equal_aspect(mut self) -> Self {
        let scale = (self.width / self.x_range.span()).min(self.height / self.y_range.span());
        let width = scale * self.x_range.span();
        let height = scale * self.y_range.span();
        self.left += (self.width - width) / 2.0;
        self.top += (self.height - height) / 2.0;
        self.width = width;
        self.height = height;
        self
    }

    /// Canvas position of a data point, or `None` when it falls outside the ranges.
    pub fn project(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !self.x_range.contains(x) || !self.y_range.contains(y) {
            return None;
        }
        let px = self.left + (x - self.x_range.min) / self.x_range.span() * self.width;
        let py = self.top + (self.y_range.max - y) / self.y_range.span() * self.height;
        Some((px, py))
    }

    pub(crate) fn frame(&self, out: &mut String, title: &str, x_label: &str, y_label: &str) {
        let _ = write!(
            out,
            "<rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' fill='none' stroke='#000000' />",
            self.left, self.top, self.width, self.height
        );
        let _ = write!(
            out,
            "<text x='{:.2}' y='{:.2}' text-anchor='middle' font-size='14'>{}</text>",
            self.left + self.width / 2.0,
            self.top - 10.0,
            title
        );
        let _ = write!(
            out,
            "<text x='{:.2}' y='{:.2}' text-anchor='middle' font-size='12'>{}</text>",
            self.left + self.width / 2.0,
            self.top + self.height + 28.0,
            x_label
        );
        let _ = write!(
            out,
            "<text x='{:.2}' y='{:.2}' text-anchor='middle' font-size='12' transform='rotate(-90 {:.2} {:.2})'>{}</text>",
            self.left - 28.0,
            self.top + self.height / 2.0,
            self.left - 28.0,
            self.top + self.height / 2.0,
            y_label
        );
        self.ticks(out);
    }

    fn ticks(&self, out: &mut String) {
        let bottom = self.top + self.height;
        for value in [self.x_range.min, 0.0, self.x_range.max] {
            if let Some((px, _)) = self.project(value, self.y_range.min) {
                let _ = write!(
                    out,
                    "<text x='{px:.2}' y='{:.2}' text-anchor='middle' font-size='10'>{value:.3}</text>",
                    bottom + 13.0
                );
            }
        }
        for value in [self.y_range.min, 0.0, self.y_range.max] {
            if let Some((_, py)) = self.project(self.x_range.min, value) {
                let _ = write!(
                    out,
                    "<text x='{:.2}' y='{py:.2}' text-anchor='end' font-size='10'>{value:.3}</text>",
                    self.left - 4.0
                );
            }
        }
    }

    /// Small filled circles, one per visible sample.
    pub(crate) fn dots(&self, out: &mut String, xs: &[f64], ys: &[f64], colour: &str) -> usize {
        let mut drawn = 0;
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            if let Some((px, py)) = self.project(x, y) {
                let _ = write!(out, "<circle cx='{px:.2}' cy='{py:.2}' r='1.2' fill='{colour}' />");
                drawn += 1;
            }
        }
        drawn
    }

    /// Polyline broken wherever a sample leaves the visible ranges.
    pub(crate) fn polyline(
        &self,
        out: &mut String,
        xs: &[f64],
        ys: &[f64],
        stroke: &str,
        width: f64,
        dashed: bool,
    ) {
        let dash = if dashed { " stroke-dasharray='6 4'" } else { "" };
        let mut flush = |segment: &mut Vec<(f64, f64)>| {
            if segment.len() > 1 {
                let points = segment
                    .iter()
                    .map(|(px, py)| format!("{px:.2},{py:.2}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = write!(
                    out,
                    "<polyline points='{points}' fill='none' stroke='{stroke}' stroke-width='{width:.1}'{dash} />"
                );
            }
            segment.clear();
        };
        let mut segment = Vec::new();
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            match self.project(x, y) {
                Some(point) => segment.push(point),
                None => flush(&mut segment),
            }
        }
        flush(&mut segment);
    }

    /// Closed outline through the samples. When some samples are clipped the
    /// outline is drawn as open runs of consecutive visible samples, wrapping
    /// from the last sample back to the first.
    pub(crate) fn polygon(&self, out: &mut String, xs: &[f64], ys: &[f64], stroke: &str) {
        let projected: Vec<Option<(f64, f64)>> = xs
            .iter()
            .zip(ys.iter())
            .map(|(&x, &y)| self.project(x, y))
            .collect();
        let Some(gap) = projected.iter().position(Option::is_none) else {
            if projected.len() > 2 {
                let points = projected
                    .iter()
                    .flatten()
                    .map(|(px, py)| format!("{px:.2},{py:.2}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = write!(
                    out,
                    "<polygon points='{points}' fill='none' stroke='{stroke}' stroke-width='1.5' />"
                );
            }
            return;
        };
        // start right after a clipped sample so no run is cut by the wrap-around
        let len = projected.len();
        let mut run_x = Vec::new();
        let mut run_y = Vec::new();
        for step in 1..=len {
            let idx = (gap + step) % len;
            if projected[idx].is_some() {
                run_x.push(xs[idx]);
                run_y.push(ys[idx]);
            } else {
                self.polyline(out, &run_x, &run_y, stroke, 1.5, false);
                run_x.clear();
                run_y.clear();
            }
        }
        self.polyline(out, &run_x, &run_y, stroke, 1.5, false);
    }

    /// Dashed vertical line across the panel at data position `x`.
    pub(crate) fn vertical_line(&self, out: &mut String, x: f64, stroke: &str) {
        if let Some((px, _)) = self.project(x, self.y_range.min) {
            let _ = write!(
                out,
                "<line x1='{px:.2}' y1='{:.2}' x2='{px:.2}' y2='{:.2}' stroke='{stroke}' stroke-dasharray='6 4' />",
                self.top,
                self.top + self.height
            );
        }
    }

    /// Five-pointed star centred on a data point.
    pub(crate) fn star(&self, out: &mut String, x: f64, y: f64, radius: f64, fill: &str) {
        let Some((cx, cy)) = self.project(x, y) else {
            return;
        };
        let points = (0..10)
            .map(|idx| {
                let r = if idx % 2 == 0 { radius } else { radius * 0.45 };
                let angle = std::f64::consts::PI * (idx as f64 / 5.0 - 0.5);
                format!("{:.2},{:.2}", cx + r * angle.cos(), cy + r * angle.sin())
            })
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(
            out,
            "<polygon class='fixed-point' points='{points}' fill='{fill}' stroke='#000000' stroke-width='0.5' />"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisRange, Panel};

    fn panel() -> Panel {
        Panel {
            left: 10.0,
            top: 20.0,
            width: 200.0,
            height: 100.0,
            x_range: AxisRange::symmetric(1.0),
            y_range: AxisRange::symmetric(1.0),
        }
    }

    #[test]
    fn projection_flips_the_vertical_axis() {
        let panel = panel();
        assert_eq!(panel.project(-1.0, 1.0), Some((10.0, 20.0)));
        assert_eq!(panel.project(1.0, -1.0), Some((210.0, 120.0)));
        assert_eq!(panel.project(1.5, 0.0), None);
        assert_eq!(panel.project(f64::NAN, 0.0), None);
    }

    #[test]
    fn equal_aspect_centres_a_square() {
        let panel = panel().with_equal_aspect();
        assert_eq!(panel.width, 100.0);
        assert_eq!(panel.height, 100.0);
        assert_eq!(panel.left, 60.0);
    }

    #[test]
    fn polyline_splits_at_clipped_samples() {
        let mut out = String::new();
        panel().polyline(
            &mut out,
            &[0.0, 0.1, 5.0, 0.2, 0.3],
            &[0.0, 0.1, 0.0, 0.2, 0.3],
            "#ff7f0e",
            2.0,
            false,
        );
        assert_eq!(out.matches("<polyline").count(), 2);
    }

    #[test]
    fn visible_outline_stays_closed() {
        let mut out = String::new();
        panel().polygon(&mut out, &[0.5, -0.5, 0.0], &[0.0, 0.0, 0.5], "#2ca02c");
        assert_eq!(out.matches("<polygon").count(), 1);
        assert!(!out.contains("<polyline"));
    }

    #[test]
    fn clipped_outline_does_not_bridge_the_gap() {
        let mut out = String::new();
        // vertex 2 is clipped; the remaining runs 3-4-0-1 join across the wrap-around
        panel().polygon(
            &mut out,
            &[0.5, 0.4, 5.0, -0.4, -0.5],
            &[0.0, 0.3, 0.0, 0.3, 0.0],
            "#2ca02c",
        );
        assert!(!out.contains("<polygon"));
        assert_eq!(out.matches("<polyline").count(), 1);
        let points = out.split("points='").nth(1).unwrap().split('\'').next().unwrap();
        assert_eq!(points.split(' ').count(), 4);

        let mut out = String::new();
        panel().polygon(
            &mut out,
            &[0.5, 5.0, 0.0, 0.1, 5.0, -0.5],
            &[0.0, 0.0, 0.5, 0.6, 0.0, 0.0],
            "#2ca02c",
        );
        assert_eq!(out.matches("<polyline").count(), 2);
    }
}
