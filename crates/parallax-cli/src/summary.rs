use std::path::Path;

use console::Style;

use crate::commands::config::RunConfig;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_run_summary(source: &Path, config: &RunConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Parallax Pipeline"));
    println!(
        "  {}",
        s.title.apply_to(
            "\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"
        )
    );
    println!();

    println!(
        "  {:<16}{}",
        s.label.apply_to("Source"),
        s.path.apply_to(source.display())
    );
    println!();

    println!("  {}", s.header.apply_to("Load"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Max frames"),
        s.value.apply_to(config.load.max_frames)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Scale"),
        s.value.apply_to(format!("1/{}", config.load.scale_factor.max(1)))
    );
    if config.load.override_width > 0 && config.load.override_height > 0 {
        println!(
            "    {:<14}{}",
            s.label.apply_to("Resize"),
            s.value.apply_to(format!(
                "{}x{}",
                config.load.override_width, config.load.override_height
            ))
        );
    }
    if config.load.rotation_degrees != 0 {
        println!(
            "    {:<14}{}",
            s.label.apply_to("Rotation"),
            s.value.apply_to(format!("{}\u{b0}", config.load.rotation_degrees))
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Process"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Templates"),
        s.value.apply_to(config.process.template_points.len())
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Template"),
        s.value.apply_to(format!("{} px", config.process.template_size))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Search window"),
        s.value.apply_to(format!("{} px", config.process.search_window_size))
    );
    println!();
}
