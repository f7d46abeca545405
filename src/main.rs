//! Convolver CLI - Kernel Image Processing
//!
//! Applies a preset convolution filter to an image using the selected
//! execution strategy, reports the elapsed time, and appends a run record
//! to a metrics file.

use anyhow::Context;
use convolver::prelude::*;
use convolver::strategy::DEFAULT_MODE;
use std::path::{Path, PathBuf};
use std::time::Instant;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return;
    }

    match args[1].as_str() {
        "list" => list_presets(),
        "help" | "--help" | "-h" => print_usage(&args[0]),
        _ => {
            if let Err(e) = process_image(&args[1..]) {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

fn print_usage(program: &str) {
    println!("Usage: {program} <input> [filter] [mode] [options]");
    println!();
    println!("Commands:");
    println!("  list              List available filters and execution modes");
    println!("  help              Show this help message");
    println!();
    println!("Arguments:");
    println!("  input             Path to the image to process");
    println!(
        "  filter            Filter preset (default: {})",
        DEFAULT_FILTER
    );
    println!("  mode              Execution mode (default: {DEFAULT_MODE})");
    println!();
    println!("Options:");
    println!("  -o, --output <path>   Output image path (default: result.png)");
    println!("  --csv <path>          Metrics CSV path (default: exec.csv)");
    println!("  --json <path>         Also write the run record as JSON lines");
}

fn list_presets() {
    let registry = PresetRegistry::with_builtins();

    println!("Available filters ({} total):", registry.len());
    for (token, entry) in registry.iter() {
        println!("  {:<10} {}", token, entry.description);
    }
    println!();
    println!("Execution modes:");
    for mode in ExecutionMode::ALL {
        let kind = if mode.is_parallel() {
            "parallel"
        } else {
            "single thread"
        };
        println!("  {:<12} {}", mode.token(), kind);
    }
}

/// Resolve a filter token, falling back to the default preset on an
/// unrecognized value instead of aborting the run.
fn filter_or_default(registry: &PresetRegistry, token: &str) -> (String, KernelMatrix) {
    match registry.create(token) {
        Ok(kernel) => (token.to_string(), kernel),
        Err(err) => {
            let allowed: Vec<_> = registry.tokens().collect();
            eprintln!(
                "Error! {err}. Allowed values are: < {} >. Using default filter settings.",
                allowed.join(" | ")
            );
            (DEFAULT_FILTER.to_string(), presets::box_blur())
        }
    }
}

/// Resolve a mode token, falling back to the default mode on an
/// unrecognized value instead of aborting the run.
fn mode_or_default(token: &str) -> ExecutionMode {
    token.parse().unwrap_or_else(|err| {
        let allowed: Vec<_> = ExecutionMode::ALL.iter().map(|m| m.token()).collect();
        eprintln!(
            "Error! {err}. Allowed values are: < {} >. Using default execution mode settings.",
            allowed.join(" | ")
        );
        DEFAULT_MODE
    })
}

/// Insert the filter token before the output extension, so
/// `result.png` becomes `result_box_blur.png`.
fn tag_output_path(path: &Path, filter: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("result");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("png");
    path.with_file_name(format!("{stem}_{filter}.{ext}"))
}

fn process_image(args: &[String]) -> anyhow::Result<()> {
    let input_path = PathBuf::from(&args[0]);

    let registry = PresetRegistry::with_builtins();

    // Positional filter and mode tokens, then options.
    let mut filter_token: Option<&str> = None;
    let mut mode_token: Option<&str> = None;
    let mut output: Option<PathBuf> = None;
    let mut csv_path = PathBuf::from("exec.csv");
    let mut json_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" if i + 1 < args.len() => {
                output = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--csv" if i + 1 < args.len() => {
                csv_path = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            "--json" if i + 1 < args.len() => {
                json_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            token if filter_token.is_none() => {
                filter_token = Some(token);
                i += 1;
            }
            token if mode_token.is_none() => {
                mode_token = Some(token);
                i += 1;
            }
            other => {
                eprintln!("Unknown option: {other}");
                i += 1;
            }
        }
    }

    if filter_token.is_none() && mode_token.is_none() {
        println!("No filter or mode specified: using default configuration.");
    }

    let (filter, kernel) = filter_or_default(&registry, filter_token.unwrap_or(DEFAULT_FILTER));
    let mode = mode_or_default(mode_token.unwrap_or(DEFAULT_MODE.token()));

    let image = load_image(&input_path)
        .with_context(|| format!("could not load image {}", input_path.display()))?;
    let (width, height) = (image.width(), image.height());

    println!("Config settings");
    println!("\tImage name:     \t{}", input_path.display());
    println!("\tImage size:     \t{width} x {height}");
    println!("\tFilter type:    \t{filter}");
    if mode.is_parallel() {
        println!("\tExecution mode: \tparallel - {mode} memory");
    } else {
        println!("\tExecution mode: \t{mode}");
    }
    println!();

    let mut engine = ConvolutionEngine::new(image);

    print!("Image processing starting... ");
    let started = Instant::now();
    engine
        .apply(&kernel, mode)
        .context("image processing failed")?;
    let elapsed = started.elapsed();
    println!("Done.");
    println!(
        "Execution time : {} microseconds",
        format_micros(elapsed)
    );

    let image_name = input_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();
    let record = RunRecord::new(image_name, width, height, filter.as_str(), mode.token(), elapsed);
    report_metrics(&record, &csv_path, json_path.as_deref());

    let output_path = tag_output_path(
        output.as_deref().unwrap_or_else(|| Path::new("result.png")),
        &filter,
    );
    print!("Saving image... ");
    save_image(engine.image(), &output_path)
        .with_context(|| format!("could not save image {}", output_path.display()))?;
    println!("Done.");
    println!("Image saved to: {}", output_path.display());

    engine.reset(mode);

    Ok(())
}

/// Metrics are best-effort: a sink failure is reported but never fails the
/// run, since the processed image is still worth saving.
fn report_metrics(record: &RunRecord, csv_path: &Path, json_path: Option<&Path>) {
    match CsvSink::create(csv_path) {
        Ok(mut sink) => {
            if let Err(e) = sink.report(record) {
                eprintln!("Error writing metrics file {}: {e}", csv_path.display());
            }
        }
        Err(e) => eprintln!("Error opening metrics file {}: {e}", csv_path.display()),
    }

    if let Some(path) = json_path {
        match JsonLinesSink::create(path) {
            Ok(mut sink) => {
                if let Err(e) = sink.report(record) {
                    eprintln!("Error writing metrics file {}: {e}", path.display());
                }
            }
            Err(e) => eprintln!("Error opening metrics file {}: {e}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_filter_falls_back_to_default() {
        let registry = PresetRegistry::with_builtins();
        let (filter, kernel) = filter_or_default(&registry, "swirl");
        assert_eq!(filter, DEFAULT_FILTER);
        assert_eq!(kernel.weights(), presets::box_blur().weights());
    }

    #[test]
    fn test_unknown_mode_falls_back_to_constant() {
        assert_eq!(mode_or_default("turbo"), ExecutionMode::Constant);
        assert_eq!(mode_or_default("sequential"), ExecutionMode::Sequential);
    }

    #[test]
    fn test_tag_output_path() {
        assert_eq!(
            tag_output_path(Path::new("result.png"), "box_blur"),
            PathBuf::from("result_box_blur.png")
        );
        assert_eq!(
            tag_output_path(Path::new("out/final.jpg"), "edge"),
            PathBuf::from("out/final_edge.jpg")
        );
    }
}
