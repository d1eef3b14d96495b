//! Implementation of the 'variants' subcommand.
//!
//! Lists the variant table group by group, marking the baseline each group's
//! RC figures are relative to.

use rcbench_core::config::BenchConfig;
use rcbench_core::terminal;

use super::load_config;
use crate::cli::VariantsArgs;
use crate::error::CliResult;

/// One display line per variant, grouped in first-appearance order.
pub fn variant_lines(config: &BenchConfig) -> Vec<(String, Vec<String>)> {
    config
        .groups()
        .into_iter()
        .map(|group| {
            let lines = config
                .variants
                .iter()
                .filter(|v| v.group == group)
                .map(|v| {
                    let marker = if config.baselines.is_baseline(v) { "*" } else { " " };
                    format!("{} {}  [{}]", marker, v.name, v.x264_params)
                })
                .collect();
            (group.to_string(), lines)
        })
        .collect()
}

/// Entry point for `rcbench variants`.
pub fn run_variants(args: VariantsArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;

    terminal::print_section("Variants");
    for (group, lines) in variant_lines(&config) {
        terminal::print_processing(&group);
        for line in lines {
            terminal::print_sub_item(&line);
        }
    }
    terminal::print_success(&format!(
        "{} variants in {} groups (* = baseline)",
        config.variants.len(),
        config.groups().len()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_lines_mark_baselines() {
        let lines = variant_lines(&BenchConfig::default());
        let groups: Vec<&str> = lines.iter().map(|(g, _)| g.as_str()).collect();
        assert_eq!(groups, vec!["entropy", "me", "part"]);

        let entropy = &lines[0].1;
        assert_eq!(entropy.len(), 2);
        assert!(entropy[0].starts_with("* CAVLC + dia + p16x16"));
        assert!(entropy[1].starts_with("  CABAC + dia + p16x16"));
        assert_eq!(lines[1].1.len(), 4);
    }
}
