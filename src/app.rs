use crate::formatting::{format_dimensions, format_loras, format_modified, format_optional};
use crate::ui::{self, base_table, build_row, header_cell, property_table};
use comfy_table::{Cell, Color, Row};
use console::style;
use infer::Infer;
use promptlens::error::ExtractError;
use promptlens::export::export_json;
use promptlens::generation::{PromptLibrary, load_excluded_words};
use promptlens::scan::{ScanOutcome, ScanSummary};
use promptlens::{ImageInfo, ScanOptions, inspect_image, scan_directory};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const EXCLUDED_WORDS_FILE: &str = "excluded_words.txt";

pub fn run() -> Result<(), String> {
    let mut state =
        AppState::new().map_err(|error| format!("No se pudo inicializar PromptLens: {error}"))?;

    ui::render_header();
    ui::render_intro(&state.current_dir);

    let mut input = String::new();
    loop {
        match read_user_input(&mut input) {
            Ok(None) => {
                println!("\n{}", style("Fin de la entrada. ¡Hasta luego!").dim());
                break;
            }
            Ok(Some(line)) => {
                if line.is_empty() {
                    continue;
                }

                if matches_command(&line, &["exit", "salir"]) {
                    println!("{}", style("Hasta luego!").dim());
                    break;
                }

                if matches_command(&line, &["ayuda", "help"]) {
                    ui::render_help();
                    continue;
                }

                match handle_input(&mut state, &line) {
                    Ok(()) => println!("{}\n", style("Consulta completada.").dim()),
                    Err(message) => eprintln!("{message}"),
                }
            }
            Err(error) => {
                eprintln!("Error al leer la entrada: {error}");
            }
        }
    }

    Ok(())
}

fn matches_command(input: &str, aliases: &[&str]) -> bool {
    aliases
        .iter()
        .any(|alias| input.eq_ignore_ascii_case(alias))
}

struct AppState {
    current_dir: PathBuf,
    last_results: Vec<ImageInfo>,
}

impl AppState {
    fn new() -> io::Result<Self> {
        Ok(Self {
            current_dir: env::current_dir()?,
            last_results: Vec::new(),
        })
    }

    fn resolve_path(&self, input: &str) -> PathBuf {
        let candidate = Path::new(input);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.current_dir.join(candidate)
        }
    }

    fn require_results(&self) -> Result<&[ImageInfo], String> {
        if self.last_results.is_empty() {
            return Err(
                "No hay resultados todavía. Procesa una imagen o un directorio primero.".to_string(),
            );
        }
        Ok(&self.last_results)
    }
}

fn handle_input(state: &mut AppState, raw_input: &str) -> Result<(), String> {
    let trimmed = raw_input.trim();
    let command = trimmed.split_whitespace().next().unwrap_or("");
    let remainder = trimmed[command.len()..].trim();

    match command.to_ascii_lowercase().as_str() {
        "exportar" | "export" => {
            if remainder.is_empty() {
                return Err("Debes indicar el archivo JSON de destino.".to_string());
            }
            export_results(state, remainder)
        }
        "prompts" => {
            if remainder.is_empty() {
                return Err("Debes indicar el archivo de texto de destino.".to_string());
            }
            write_prompt_library(state, remainder)
        }
        _ => inspect_path(state, trimmed),
    }
}

fn inspect_path(state: &mut AppState, input: &str) -> Result<(), String> {
    let path = state.resolve_path(input);
    let metadata = fs::metadata(&path)
        .map_err(|error| format!("No se pudo acceder a `{}`: {error}", path.display()))?;

    if metadata.is_dir() {
        let summary = scan_directory(&path, &ScanOptions::default());
        render_scan_summary(&summary, &path);
        state.last_results = summary.into_images();
        return Ok(());
    }

    let info = inspect_image(&path).map_err(|error| match error {
        ExtractError::VideoContainer { kind } => format!(
            "`{}` es un video {kind}; solo se procesan imágenes.",
            path.display()
        ),
        other => format!("No se pudo procesar `{}`: {other}", path.display()),
    })?;
    render_image_info(&info, &metadata);
    state.last_results = vec![info];
    Ok(())
}

fn export_results(state: &AppState, target: &str) -> Result<(), String> {
    let results = state.require_results()?;
    let path = state.resolve_path(target);
    export_json(results, &path)
        .map_err(|error| format!("No se pudo exportar `{}`: {error}", path.display()))?;
    println!(
        "{} {}",
        style(format!("{} imágenes exportadas a", results.len())).green(),
        style(path.display()).white()
    );
    Ok(())
}

fn write_prompt_library(state: &AppState, target: &str) -> Result<(), String> {
    let results = state.require_results()?;
    let excluded_path = state.current_dir.join(EXCLUDED_WORDS_FILE);
    let excluded_words = if excluded_path.is_file() {
        load_excluded_words(&excluded_path)
    } else {
        Vec::new()
    };

    let mut library = PromptLibrary::new(excluded_words);
    for info in results {
        library.add(&info.generation);
    }
    if library.is_empty() {
        return Err("Ninguna imagen tiene un prompt utilizable.".to_string());
    }

    let path = state.resolve_path(target);
    library
        .write_to(&path)
        .map_err(|error| format!("No se pudo guardar `{}`: {error}", path.display()))?;
    println!(
        "{} {}",
        style(format!("{} prompts únicos guardados en", library.len())).green(),
        style(path.display()).white()
    );
    Ok(())
}

fn render_image_info(info: &ImageInfo, metadata: &fs::Metadata) {
    let mut table = property_table();
    table.add_row(build_row(
        "Ruta",
        &info.path.display().to_string(),
        Color::White,
    ));
    table.add_row(build_row("Formato", &info.kind.label(), Color::White));
    table.add_row(build_row(
        "Tipo MIME",
        &mime_type(&info.path).unwrap_or_else(|| "No disponible".to_string()),
        Color::White,
    ));
    table.add_row(build_row(
        "Dimensiones",
        &format_dimensions(info.width, info.height, Some(metadata.len())),
        Color::White,
    ));
    table.add_row(build_row(
        "Última modificación",
        &format_modified(metadata),
        Color::White,
    ));

    let generation = &info.generation;
    if generation.is_empty() {
        println!("\n{table}");
        println!(
            "{}",
            style("La imagen no contiene parámetros de generación reconocibles.").yellow()
        );
        return;
    }

    let rows = [
        ("Prompt", format_optional(generation.prompt.as_deref())),
        (
            "Prompt negativo",
            format_optional(generation.negative_prompt.as_deref()),
        ),
        ("Pasos", format_optional(generation.steps)),
        ("CFG scale", format_optional(generation.cfg_scale)),
        ("Sampler", format_optional(generation.sampler.as_deref())),
        ("Scheduler", format_optional(generation.scheduler.as_deref())),
        ("Semilla", format_optional(generation.seed)),
        ("Modelo", format_optional(generation.model_name.as_deref())),
        (
            "Hash del modelo",
            format_optional(generation.model_hash.as_deref()),
        ),
        ("LoRAs", format_loras(&generation.loras)),
    ];
    for (label, value) in rows {
        table.add_row(build_row(label, &value, Color::Green));
    }

    println!("\n{table}");
}

fn render_scan_summary(summary: &ScanSummary, root: &Path) {
    if summary.entries.is_empty() {
        println!(
            "\n{}\n",
            style(format!(
                "[{}] No se encontraron imágenes ni videos",
                root.display()
            ))
            .dim()
        );
        return;
    }

    let mut table = base_table();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Archivo"),
        header_cell("Resultado"),
        header_cell("Detalle"),
    ]);

    for (index, entry) in summary.entries.iter().enumerate() {
        let name = entry
            .path
            .strip_prefix(root)
            .unwrap_or(&entry.path)
            .display()
            .to_string();
        let (badge, badge_color, detail) = match &entry.outcome {
            ScanOutcome::Parsed(info) => scan_detail(info),
            ScanOutcome::SkippedVideo(kind) => ("VIDEO", Color::Yellow, format!("{kind} omitido")),
            ScanOutcome::Failed(reason) => ("ERROR", Color::Red, reason.clone()),
        };
        table.add_row(Row::from(vec![
            Cell::new(format!("{:>2}", index + 1)).fg(Color::White),
            Cell::new(name).fg(Color::White),
            Cell::new(badge).fg(badge_color),
            Cell::new(detail).fg(Color::White),
        ]));
    }

    println!(
        "\n{}",
        style(format!("Resultados en {}", root.display()))
            .cyan()
            .bold()
    );
    println!("{table}");
    println!(
        "{}\n",
        style(format!(
            "{} imágenes procesadas ({} con parámetros), {} videos omitidos, {} errores",
            summary.parsed_count(),
            summary.with_generation_count(),
            summary.video_count(),
            summary.failed_count()
        ))
        .dim()
    );
}

fn scan_detail(info: &ImageInfo) -> (&'static str, Color, String) {
    let generation = &info.generation;
    if generation.is_empty() {
        return (
            "IMAGEN",
            Color::White,
            format!(
                "{}, sin parámetros",
                format_dimensions(info.width, info.height, None)
            ),
        );
    }

    let mut detail = format_dimensions(info.width, info.height, None);
    if let Some(sampler) = &generation.sampler {
        detail.push_str(&format!(", {sampler}"));
    }
    if let Some(steps) = generation.steps {
        detail.push_str(&format!(", {steps} pasos"));
    }
    if !generation.loras.is_empty() {
        detail.push_str(&format!(", {} LoRAs", generation.loras.len()));
    }
    ("IA", Color::Green, detail)
}

fn mime_type(path: &Path) -> Option<String> {
    Infer::new()
        .get_from_path(path)
        .ok()
        .flatten()
        .map(|kind| kind.mime_type().to_string())
}

fn read_user_input(buffer: &mut String) -> io::Result<Option<String>> {
    print!("{} ", style("Ruta").bold().cyan());
    print!("{} ", style("›").cyan());
    io::stdout().flush()?;

    buffer.clear();
    let bytes_read = io::stdin().read_line(buffer)?;
    if bytes_read == 0 {
        return Ok(None);
    }

    Ok(Some(buffer.trim().to_string()))
}
