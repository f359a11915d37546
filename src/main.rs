use std::path::PathBuf;

use careerline::prelude::*;
use log::LevelFilter;
use simple_logger::SimpleLogger;

const RECORDS_VAR: &str = "CAREERLINE_RECORDS";
const CONFIG_VAR: &str = "CAREERLINE_CONFIG";

fn records_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(RECORDS_VAR).map(PathBuf::from))
}

fn load_config() -> TimelineConfig {
    let Some(path) = std::env::var_os(CONFIG_VAR) else {
        return TimelineConfig::default();
    };
    TimelineConfig::load(&path).unwrap_or_else(|err| {
        log::error!("ignoring {CONFIG_VAR}: {err}");
        TimelineConfig::default()
    })
}

fn source() -> Box<dyn ContentSource> {
    match records_path() {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(StaticSource::new(sample_records())),
    }
}

fn main() -> eframe::Result {
    if let Err(err) = SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
    {
        eprintln!("logger already initialized: {err}");
    }

    let mut app = PortfolioApp::new(source(), load_config()).heading("Work history");
    app.push_card(Box::new(
        TextCard::new(
            "Hello",
            "Scrub the timeline or press play to watch skills grow from role to role.",
        )
        .contact("General enquiry"),
    ));
    app.run("careerline")
}
