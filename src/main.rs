use clap::{Parser, Subcommand};
use tracing::{info, warn};

use uabc_indicadores::config::Config;
use uabc_indicadores::constants::{BASE_URL, DATASET_CATALOG};
use uabc_indicadores::logging;
use uabc_indicadores::pipeline;
use uabc_indicadores::validator;

#[derive(Parser)]
#[command(name = "uabc_indicadores")]
#[command(about = "UABC institutional indicators cleaning pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean every raw dataset file and write CSVs plus quality reports
    Clean {
        /// Only process files whose name contains this substring
        #[arg(long)]
        filter: Option<String>,
    },
    /// Validate downloaded files (size, structure, catalog coverage)
    Validate,
    /// List the dataset catalog
    Datasets,
}

fn run_clean(config: &Config, filter: Option<&str>) -> anyhow::Result<()> {
    println!("🧹 Procesando datasets de {}...", config.folders.raw);

    let summary = pipeline::run(config, filter)?;
    if summary.outcomes.is_empty() {
        warn!("no raw files found");
        println!("⚠️  No se encontraron archivos en {}", config.folders.raw);
        println!("   Ejecuta primero el scraper para descargarlos");
        return Ok(());
    }

    println!("\n📊 Resumen del procesamiento:");
    for p in summary.processed() {
        println!("\n   • {}", p.file);
        println!("     Tipo: {} (plan {})", p.kind.as_str(), p.plan.as_str());
        println!("     Filas: {} → {}", p.rows_before, p.rows_after);
        println!("     Columnas: {} → {}", p.cols_before, p.cols_after);
        println!("     Salida: {}", p.output_csv);
        if !p.warnings.is_empty() {
            println!("     ⚠️  {} advertencias:", p.warnings.len());
            for w in &p.warnings {
                println!("        - [{}] {}", w.stage, w.message);
            }
        }
    }

    let failures = summary.failure_count();
    if failures > 0 {
        println!("\n❌ Datasets con errores: {failures}");
        for (file, error) in summary.failed() {
            println!("   • {file}: {error}");
        }
    } else {
        println!("\n✅ Todos los datasets se procesaron correctamente");
    }

    info!(
        processed = summary.processed().count(),
        failed = failures,
        "clean run finished"
    );
    Ok(())
}

fn run_validate(config: &Config) -> anyhow::Result<()> {
    println!("🔍 Validando archivos descargados en {}...", config.folders.raw);

    let report = validator::validate_downloads(
        std::path::Path::new(&config.folders.raw),
        config.cleaning.min_file_size_kb,
    )?;

    if report.checks.is_empty() {
        println!("⚠️  No se encontraron archivos descargados");
        return Ok(());
    }

    for check in &report.checks {
        let mark = if check.is_valid() { "✓" } else { "✗" };
        println!(
            "   {} {} ({:.2} KB) - {}",
            mark, check.file, check.size_kb, check.structure_message
        );
    }

    println!(
        "\nArchivos válidos: {}/{}",
        report.valid_count(),
        report.checks.len()
    );
    println!(
        "Cobertura del catálogo: {}/{} ({:.1}%)",
        report.coverage.found.len(),
        report.coverage.expected,
        report.coverage.percent()
    );
    if !report.coverage.missing.is_empty() {
        println!("\n⚠️  Datasets faltantes:");
        for name in &report.coverage.missing {
            println!("   - {name}");
        }
    }
    Ok(())
}

fn run_datasets() {
    println!("📚 Catálogo de datasets ({}):\n", BASE_URL);
    for dataset in DATASET_CATALOG {
        println!("   • {} (prioridad {})", dataset.name, dataset.priority);
        println!("     {}", dataset.description);
        println!("     {}{}", BASE_URL, dataset.url_path);
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Clean { filter } => run_clean(&config, filter.as_deref())?,
        Commands::Validate => run_validate(&config)?,
        Commands::Datasets => run_datasets(),
    }
    Ok(())
}
