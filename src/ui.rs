use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Row, Table};
use console::style;
use std::path::Path;

const HEADER_WIDTH: usize = 74;

pub fn render_header() {
    let border = "─".repeat(HEADER_WIDTH - 2);
    println!("\n{}", style(format!("┌{}┐", border)).cyan());
    println!(
        "{}",
        style(format!(
            "│ {:^inner_width$} │",
            "▸ PromptLens · Metadata de generación de imágenes IA ◂",
            inner_width = HEADER_WIDTH - 4
        ))
        .cyan()
        .bold()
    );
    println!("{}\n", style(format!("└{}┘", border)).cyan());
}

pub fn render_intro(current_dir: &Path) {
    println!(
        "{} {}",
        style("Directorio de trabajo:").dim(),
        style(current_dir.display()).white()
    );
    println!(
        "{}",
        style("Escribe la ruta de una imagen o de un directorio para leer sus parámetros.").dim()
    );
    println!(
        "{}\n",
        style("Escribe 'ayuda' para ver los comandos o 'salir' para terminar.").dim()
    );
}

pub fn render_help() {
    let help_lines = [
        "┌─ Comandos disponibles:",
        "│   • <ruta de imagen>        Muestra dimensiones y parámetros de generación",
        "│   • <ruta de directorio>    Procesa todas las imágenes del directorio",
        "│   • exportar <archivo.json> Guarda el último resultado como JSON",
        "│   • prompts <archivo.txt>   Guarda los pares prompt|||negativo sin duplicados",
        "│   • ayuda | help            Muestra esta ayuda",
        "│   • salir | exit            Termina la sesión",
        "└─",
    ];

    println!();
    for line in help_lines.iter() {
        println!("{}", style(line).cyan().dim());
    }
    println!();
}

pub fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn property_table() -> Table {
    let mut table = base_table();
    table.set_header(vec![header_cell("Propiedad"), header_cell("Valor")]);
    table
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
        .add_attribute(Attribute::Underlined)
}

pub fn build_row(label: &str, value: &str, value_color: Color) -> Row {
    Row::from(vec![
        Cell::new(label).fg(Color::Rgb {
            r: 160,
            g: 196,
            b: 255,
        }),
        Cell::new(value).fg(value_color),
    ])
}
