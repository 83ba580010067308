/// Initializes the logging system from the default file `log4rs.yaml` in the
/// working directory. Prefer [`configure`] for programmatic control.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let _ = log4rs::init_file("log4rs.yaml", log4rs::config::Deserializers::default());
    Ok(())
}

/// Configures logging globally: a rolling app log under `dir`, with audit
/// lines (target `fieldhash::audit`) routed to their own file.
/// - dir: base directory for logs; if None, current directory.
/// - level: error|warn|info|debug|trace
pub fn configure(dir: Option<&std::path::Path>, level: Option<&str>) {
    use log::LevelFilter;
    use log4rs::append::rolling_file::RollingFileAppender;
    use log4rs::append::rolling_file::policy::compound::{
        CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
    };
    use log4rs::config::{Appender, Config, Logger, Root};
    use log4rs::encode::pattern::PatternEncoder;
    use std::path::PathBuf;

    let base = dir
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let lvl = match level.unwrap_or("info").to_ascii_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    let enc_pattern = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";

    let app_roller = FixedWindowRoller::builder()
        .build(&format!("{}", base.join("app.{}.log").display()), 7)
        .unwrap();
    let app_policy =
        CompoundPolicy::new(Box::new(SizeTrigger::new(10 * 1024 * 1024)), Box::new(app_roller));
    let app_appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(enc_pattern)))
        .build(base.join("app.log"), Box::new(app_policy))
        .unwrap();

    let audit_roller = FixedWindowRoller::builder()
        .build(&format!("{}", base.join("audit.{}.log").display()), 7)
        .unwrap();
    let audit_policy =
        CompoundPolicy::new(Box::new(SizeTrigger::new(10 * 1024 * 1024)), Box::new(audit_roller));
    let audit_appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(enc_pattern)))
        .build(base.join("audit.log"), Box::new(audit_policy))
        .unwrap();

    let config = Config::builder()
        .appender(Appender::builder().build("app", Box::new(app_appender)))
        .appender(Appender::builder().build("audit", Box::new(audit_appender)))
        .logger(Logger::builder().appender("audit").additive(false).build("fieldhash::audit", lvl))
        .build(Root::builder().appender("app").build(lvl))
        .unwrap();
    let _ = log4rs::init_config(config);
}
