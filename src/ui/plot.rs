use eframe::egui::{self, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoint, PlotPoints, Points,
};
use rankings_explorer::data::aggregate::{Aggregate, ChartKind, RegionScore};

use crate::color::region_label;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 340.0;

// ---------------------------------------------------------------------------
// Main chart (selected chart kind)
// ---------------------------------------------------------------------------

/// Chart-kind selector plus the chart itself.
pub fn main_chart(ui: &mut Ui, state: &mut AppState) {
    let mut kind = state.chart_kind;
    egui::ComboBox::from_label("Visualization type")
        .selected_text(kind.label())
        .show_ui(ui, |ui: &mut Ui| {
            for k in ChartKind::ALL {
                ui.selectable_value(&mut kind, k, k.label());
            }
        });
    state.set_chart_kind(kind);

    if state.chart.is_empty() {
        ui.label("Insufficient data points for this visualization.");
        return;
    }

    let colors = &state.colors;
    let (x_label, y_label) = match state.chart_kind {
        ChartKind::Scatter => ("Overall score", "Academic reputation"),
        ChartKind::RegionalBar => ("Region", "Average overall score"),
        ChartKind::DistributionBox => ("Region", "Overall score"),
        ChartKind::ScoreHistogram => ("Overall score", "Number of universities"),
    };

    let mut plot = Plot::new(("main_chart", state.chart_kind.code()))
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label(y_label);
    if let Aggregate::Scatter(groups) = &state.chart {
        let hovers: Vec<([f64; 2], String)> = groups
            .iter()
            .flat_map(|g| &g.items)
            .map(|p| ([p.overall, p.ar], p.label.hover_text()))
            .collect();
        plot = plot.label_formatter(move |series, value| hover_label(&hovers, series, value));
    }

    plot.show(ui, |plot_ui| match &state.chart {
        Aggregate::Scatter(groups) => {
            for group in groups {
                let region = group.region.as_deref();
                let points: PlotPoints =
                    group.items.iter().map(|p| [p.overall, p.ar]).collect();
                plot_ui.points(
                    Points::new(points)
                        .name(region_label(region))
                        .color(colors.color_for(region))
                        .radius(3.0),
                );
            }
        }
        Aggregate::RegionalBar(means) => {
            for (i, m) in means.iter().enumerate() {
                let region = m.region.as_deref();
                let bar = Bar::new(i as f64, m.mean)
                    .name(format!("{} ({} scored)", region_label(region), m.count))
                    .width(0.7);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(region_label(region))
                        .color(colors.color_for(region)),
                );
            }
        }
        Aggregate::DistributionBox(groups) => {
            for (i, group) in groups.iter().enumerate() {
                let Some(spread) = box_spread(&group.items) else {
                    continue;
                };
                let region = group.region.as_deref();
                let elem = BoxElem::new(i as f64, spread)
                    .name(region_label(region))
                    .box_width(0.6);
                plot_ui.box_plot(
                    BoxPlot::new(vec![elem])
                        .name(region_label(region))
                        .color(colors.color_for(region)),
                );
            }
        }
        Aggregate::ScoreHistogram { scores, bins } => {
            // stack each region on top of the ones before it
            let mut charts: Vec<BarChart> = Vec::new();
            for (region, bars) in histogram_bars(scores, *bins) {
                let mut chart = BarChart::new(bars)
                    .name(region_label(region))
                    .color(colors.color_for(region));
                if !charts.is_empty() {
                    let below: Vec<&BarChart> = charts.iter().collect();
                    chart = chart.stack_on(&below);
                }
                charts.push(chart);
            }
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Secondary charts
// ---------------------------------------------------------------------------

/// First N scored universities of the filtered selection, coloured by region.
pub fn top_chart(ui: &mut Ui, state: &AppState) {
    if state.top.is_empty() {
        ui.label("No universities available for the elite performers chart.");
        return;
    }
    ui.label(format!(
        "Displaying the first {} scored universities of your selection",
        state.top.len()
    ));
    Plot::new("top_chart")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("University")
        .y_axis_label("Overall score")
        .show(ui, |plot_ui| {
            for (i, entry) in state.top.iter().enumerate() {
                let region = entry.region.as_deref();
                let bar = Bar::new(i as f64, entry.overall)
                    .name(entry.name.as_deref().unwrap_or("Unnamed"))
                    .width(0.8);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(region_label(region))
                        .color(state.colors.color_for(region)),
                );
            }
        });
}

/// Research level vs Overall score; marker size follows the EO score.
pub fn research_chart(ui: &mut Ui, state: &AppState) {
    let plottable = state
        .research
        .iter()
        .flat_map(|g| &g.items)
        .filter(|p| p.research.is_some())
        .count();
    if plottable == 0 {
        ui.label("Insufficient data for research excellence analysis.");
        return;
    }
    let hovers: Vec<([f64; 2], String)> = state
        .research
        .iter()
        .flat_map(|g| &g.items)
        .filter_map(|p| Some(([p.research?, p.overall], p.label.hover_text())))
        .collect();
    Plot::new("research_chart")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Research level")
        .y_axis_label("Overall score")
        .label_formatter(move |series, value| hover_label(&hovers, series, value))
        .show(ui, |plot_ui| {
            for group in &state.research {
                let region = group.region.as_deref();
                for p in &group.items {
                    let Some(research) = p.research else { continue };
                    plot_ui.points(
                        Points::new(PlotPoints::new(vec![[research, p.overall]]))
                            .name(region_label(region))
                            .color(state.colors.color_for(region))
                            .radius(eo_radius(p.eo)),
                    );
                }
            }
        });
}

fn eo_radius(eo: f64) -> f32 {
    2.0 + (eo.clamp(0.0, 100.0) / 100.0 * 8.0) as f32
}

/// Hover text for the point nearest the cursor. `series` is empty when the
/// cursor is over no item, and then only the coordinates are shown.
fn hover_label(points: &[([f64; 2], String)], series: &str, value: &PlotPoint) -> String {
    let coords = format!("x = {:.1}, y = {:.1}", value.x, value.y);
    if series.is_empty() {
        return coords;
    }
    let distance = |p: &[f64; 2]| (p[0] - value.x).powi(2) + (p[1] - value.y).powi(2);
    match points
        .iter()
        .min_by(|(a, _), (b, _)| distance(a).total_cmp(&distance(b)))
    {
        Some((_, text)) => format!("{text}\n{coords}"),
        None => coords,
    }
}

// ---------------------------------------------------------------------------
// Rendering-side statistics
// ---------------------------------------------------------------------------

/// Quartiles by linear interpolation; whiskers at the furthest points within
/// 1.5 IQR of the box.
fn box_spread(values: &[f64]) -> Option<BoxSpread> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let fence = 1.5 * (q3 - q1);
    let lower = sorted.iter().copied().find(|v| *v >= q1 - fence).unwrap_or(q1);
    let upper = sorted.iter().rev().copied().find(|v| *v <= q3 + fence).unwrap_or(q3);
    Some(BoxSpread::new(lower, q1, median, q3, upper))
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Equal-width bins over the score range, one bar series per region in
/// first-seen order.
fn histogram_bars(scores: &[RegionScore], bins: usize) -> Vec<(Option<&str>, Vec<Bar>)> {
    let Some((start, width)) = bin_layout(scores.iter().map(|s| s.score), bins) else {
        return Vec::new();
    };

    let mut counts: Vec<(Option<&str>, Vec<usize>)> = Vec::new();
    for s in scores {
        let region = s.region.as_deref();
        let idx = match counts.iter().position(|(r, _)| *r == region) {
            Some(idx) => idx,
            None => {
                counts.push((region, vec![0; bins]));
                counts.len() - 1
            }
        };
        counts[idx].1[bin_index(s.score, start, width, bins)] += 1;
    }

    counts
        .into_iter()
        .map(|(region, per_bin)| {
            let bars = per_bin
                .iter()
                .enumerate()
                .map(|(i, &n)| Bar::new(start + (i as f64 + 0.5) * width, n as f64).width(width))
                .collect();
            (region, bars)
        })
        .collect()
}

/// `(start, width)` of `bins` equal bins covering every value.
fn bin_layout(values: impl Iterator<Item = f64>, bins: usize) -> Option<(f64, f64)> {
    let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;
    if bins == 0 {
        return None;
    }
    let span = max - min;
    let width = if span > 0.0 { span / bins as f64 } else { 1.0 };
    Some((min, width))
}

fn bin_index(v: f64, start: f64, width: f64, bins: usize) -> usize {
    (((v - start) / width).floor() as usize).min(bins - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantiles_interpolate() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert_eq!(quantile(&sorted, 0.25), 1.75);
        assert_eq!(quantile(&[7.0], 0.75), 7.0);
    }

    #[test]
    fn box_spread_clips_whiskers_to_fence() {
        let spread = box_spread(&[10.0, 11.0, 12.0, 13.0, 100.0]).unwrap();
        assert_eq!(spread.median, 12.0);
        assert_eq!(spread.upper_whisker, 13.0);
        assert_eq!(spread.lower_whisker, 10.0);
        assert!(box_spread(&[]).is_none());
    }

    #[test]
    fn hover_names_the_nearest_institution() {
        let points = vec![
            ([96.9, 100.0], "University of Oxford\nUnited Kingdom".to_string()),
            ([74.1, 88.0], "Kyoto University\nJapan".to_string()),
        ];
        let text = hover_label(&points, "Asia", &PlotPoint::new(74.1, 88.0));
        assert!(text.starts_with("Kyoto University\nJapan\n"));

        let bare = hover_label(&points, "", &PlotPoint::new(74.1, 88.0));
        assert_eq!(bare, "x = 74.1, y = 88.0");
    }

    #[test]
    fn max_value_lands_in_last_bin() {
        let (start, width) = bin_layout([50.0, 100.0].into_iter(), 20).unwrap();
        assert_eq!(width, 2.5);
        assert_eq!(bin_index(100.0, start, width, 20), 19);
        assert_eq!(bin_index(50.0, start, width, 20), 0);
        assert!(bin_layout(std::iter::empty(), 20).is_none());
    }
}
