use citylayout::{CityConfig, DistrictType, ZoneType, generate_city};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Генератор раскладки участков и районов города
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (по умолчанию: встроенный пресет)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Сид генератора случайных чисел
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Путь для сохранения участков и районов в JSON (по умолчанию: city.json)
    #[arg(short, long, default_value = "city.json")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("🔍 Загрузка конфигурации...");
    let config = match &cli.config {
        Some(path) => CityConfig::from_toml_file(path)?,
        None => CityConfig::default(),
    };

    println!(
        "Генерация города (карта {}×{}, сид {})...",
        config.map_size, config.map_size, cli.seed
    );
    let city = generate_city(&config, cli.seed)?;

    let zones = city.zone_counts();
    let districts = city.district_counts();
    println!(
        "Участков: {}, районов: {}, попыток: {}",
        city.plots.len(),
        city.districts.len(),
        city.attempts
    );
    for zone in ZoneType::ALL {
        if let Some(count) = zones.get(&zone) {
            println!("  {zone:?}: {count}");
        }
    }
    for district_type in DistrictType::ALL {
        println!(
            "  район {district_type:?}: {}",
            districts.get(&district_type).copied().unwrap_or(0)
        );
    }

    println!("Сохранение в {:?}", cli.output);
    let writer = BufWriter::new(File::create(&cli.output)?);
    serde_json::to_writer_pretty(writer, &city)?;

    println!("\nГотово! Город сохранён.");
    Ok(())
}
