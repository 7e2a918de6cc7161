use sheet_scorer::image::io::{load_grayscale, write_json_file};
use sheet_scorer::{report, template, SheetParams, SheetScorer, TemplateError};
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        println!(
            "Usage: {} <source-image> <template> <results> [debug-dir]",
            args.first().map(String::as_str).unwrap_or("sheet-scorer")
        );
        return;
    }
    if let Err(err) = run(
        Path::new(&args[1]),
        Path::new(&args[2]),
        Path::new(&args[3]),
        args.get(4).map(PathBuf::from),
    ) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(
    source_path: &Path,
    template_path: &Path,
    result_path: &Path,
    debug_dir: Option<PathBuf>,
) -> Result<(), String> {
    let gray = load_grayscale(source_path)?;
    let scorer = SheetScorer::new(SheetParams::default());

    // An existing template fixes the layout; otherwise calibrate fresh and
    // save the layout for subsequent sheets of the same kind.
    let loaded = match template::load(template_path) {
        Ok(boundaries) => Some(boundaries),
        Err(TemplateError::NotFound { .. }) => None,
        Err(err) => return Err(err.to_string()),
    };

    let sheet = scorer
        .process(&gray, loaded.as_ref())
        .map_err(|e| e.to_string())?;
    if loaded.is_none() {
        template::save(template_path, &sheet.boundaries).map_err(|e| e.to_string())?;
    }

    report::append_row(result_path, &sheet.answers).map_err(|e| e.to_string())?;
    for answer in &sheet.answers {
        print!("{} ", answer.report_value());
    }
    println!();

    if let Some(dir) = debug_dir {
        write_json_file(&dir.join("sheet_report.json"), &sheet)?;
        eprintln!("Debug report written to {}", dir.display());
    }

    Ok(())
}
