use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

const CONFIG_FILE_ENVIRONMENT_VARIABLE: &str = "STRIP_STITCHER_LOG_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "log4rs.yaml";
const FALLBACK_APPENDER_NAME: &str = "stderr";

#[ctor::ctor]
fn init() {
    let config_file = std::env::var(CONFIG_FILE_ENVIRONMENT_VARIABLE)
        .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_owned());
    if log4rs::init_file(&config_file, Default::default()).is_ok() {
        return;
    }
    // stdout is reserved for progress lines
    if let Some(config) = fallback_config() {
        if let Err(e) = log4rs::init_config(config) {
            eprintln!("Unable to initialise logging: {}", e);
        }
    }
}

fn fallback_config() -> Option<Config> {
    let appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{l} {t} - {m}{n}")))
        .build();
    Config::builder()
        .appender(Appender::builder().build(FALLBACK_APPENDER_NAME, Box::new(appender)))
        .build(
            Root::builder()
                .appender(FALLBACK_APPENDER_NAME)
                .build(LevelFilter::Warn),
        )
        .ok()
}
