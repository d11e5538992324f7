#[cfg(feature = "cairo-backend")]
use catbars::api::{BarChart, ChartJob};
#[cfg(feature = "cairo-backend")]
use catbars::render::CairoTextMeasurer;
#[cfg(feature = "cairo-backend")]
use std::path::PathBuf;

#[cfg(feature = "cairo-backend")]
#[derive(Debug)]
struct CliArgs {
    job_path: PathBuf,
    png_path: Option<PathBuf>,
    pdf_path: Option<PathBuf>,
    layout_json_path: Option<PathBuf>,
    verbose: bool,
}

#[cfg(feature = "cairo-backend")]
fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cairo-backend"))]
fn main() {
    eprintln!("this tool requires feature `cairo-backend`");
    std::process::exit(1);
}

#[cfg(feature = "cairo-backend")]
fn run() -> Result<(), String> {
    let args = parse_args()?;
    let filter = if args.verbose { "catbars=debug" } else { "info" };
    let _ = catbars::telemetry::init_tracing_with_filter(filter);

    let job = ChartJob::from_path(&args.job_path)
        .map_err(|err| format!("failed to load `{}`: {err}", args.job_path.display()))?;
    let png_path = args
        .png_path
        .clone()
        .or_else(|| job.options.file_name.clone())
        .ok_or_else(|| {
            "no output path: pass --output or set `options.file_name` in the job".to_owned()
        })?;

    let measurer = CairoTextMeasurer::new().map_err(|err| err.to_string())?;
    let chart = BarChart::from_job(job, &measurer).map_err(|err| err.to_string())?;

    chart
        .write_png(&png_path)
        .map_err(|err| format!("failed to write `{}`: {err}", png_path.display()))?;
    println!("wrote {}", png_path.display());

    if let Some(pdf_path) = &args.pdf_path {
        chart
            .write_pdf(pdf_path)
            .map_err(|err| format!("failed to write `{}`: {err}", pdf_path.display()))?;
        println!("wrote {}", pdf_path.display());
    }

    if let Some(layout_path) = &args.layout_json_path {
        let json = chart
            .layout()
            .snapshot()
            .to_json_pretty()
            .map_err(|err| err.to_string())?;
        std::fs::write(layout_path, json)
            .map_err(|err| format!("failed to write `{}`: {err}", layout_path.display()))?;
        println!("wrote {}", layout_path.display());
    }

    Ok(())
}

#[cfg(feature = "cairo-backend")]
fn parse_args() -> Result<CliArgs, String> {
    let mut job_path: Option<PathBuf> = None;
    let mut png_path: Option<PathBuf> = None;
    let mut pdf_path: Option<PathBuf> = None;
    let mut layout_json_path: Option<PathBuf> = None;
    let mut verbose = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--output" | "-o" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                png_path = Some(PathBuf::from(value));
            }
            "--pdf" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --pdf".to_owned())?;
                pdf_path = Some(PathBuf::from(value));
            }
            "--layout-json" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --layout-json".to_owned())?;
                layout_json_path = Some(PathBuf::from(value));
            }
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => {
                println!("{}", usage_message());
                std::process::exit(0);
            }
            _ if job_path.is_none() && !arg.starts_with('-') => {
                job_path = Some(PathBuf::from(arg));
            }
            _ => {
                return Err(format!("unknown argument `{arg}`\n\n{}", usage_message()));
            }
        }
    }

    let job_path = job_path.ok_or_else(|| format!("missing job file\n\n{}", usage_message()))?;
    Ok(CliArgs {
        job_path,
        png_path,
        pdf_path,
        layout_json_path,
        verbose,
    })
}

#[cfg(feature = "cairo-backend")]
fn usage_message() -> String {
    "Usage: catbars-render <job.json> [options]\n\nOptions:\n  -o, --output <path>    PNG destination (default: options.file_name)\n  --pdf <path>           Also write a PDF\n  --layout-json <path>   Write the solved layout as JSON\n  -v, --verbose          Log layout steps\n  -h, --help             Show this message".to_owned()
}
