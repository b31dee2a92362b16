use std::path::Path;

use console::Style;
use swe_core::analysis::{AnalysisResult, SATURATED_KEY, VOID_KEY};
use swe_core::pipeline::config::AnalysisConfig;
use swe_core::stats::nan_mean;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_analysis_summary(scan: &Path, config: &AnalysisConfig, result: &AnalysisResult) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("SWE Quantification"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(18)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Scan"),
        s.path.apply_to(scan.display())
    );
    let roi = result
        .roi_coords
        .points()
        .iter()
        .map(|p| format!("({}, {})", p.x(), p.y()))
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "  {:<14}{} {}",
        s.label.apply_to("ROI"),
        s.method.apply_to(&result.roi_shape),
        s.value.apply_to(roi)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(result.frame_count())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Calibration"),
        s.method.apply_to(&config.calibration.source)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Max scale"),
        s.value.apply_to(format!(
            "{} {}",
            config.max_scale,
            config.variable.unit()
        ))
    );
    println!();

    println!("  {}", s.header.apply_to("Coverage"));
    for (label, key) in [("Void", VOID_KEY), ("Saturated", SATURATED_KEY)] {
        let mean = result
            .stats
            .get(key)
            .map(|v| nan_mean(v.iter()))
            .unwrap_or(f64::NAN);
        println!(
            "    {:<12}{}",
            s.label.apply_to(label),
            s.value.apply_to(format!("{mean:.1}% (mean per frame)"))
        );
    }
    println!();

    let variable = config.variable;
    println!("  {}", s.header.apply_to(variable.label()));
    match result.summary(variable) {
        Some(summary) => {
            let unit = variable.unit();
            for (label, value) in [
                ("Median", summary.median),
                ("Mean", summary.mean),
                ("SD", summary.sd),
                ("Steady mean", summary.steady_mean),
            ] {
                println!(
                    "    {:<12}{}",
                    s.label.apply_to(label),
                    s.value.apply_to(format!("{value:.2} {unit}"))
                );
            }
            let frames: Vec<String> = summary
                .steady_frames
                .iter()
                .enumerate()
                .filter(|(_, keep)| **keep)
                .map(|(i, _)| i.to_string())
                .collect();
            println!(
                "    {:<12}{}",
                s.label.apply_to("Steady over"),
                s.value.apply_to(format!("frames {}", frames.join(", ")))
            );
        }
        None => println!(
            "    {}",
            s.disabled.apply_to("no valid values in this clip")
        ),
    }
    println!();
}
