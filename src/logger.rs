use std::io::Write;

/// Installs a colored stderr logger for the `log` facade.
///
/// `RUST_LOG` defaults to `trace` and `RUST_LOG_STYLE` to `always`. Calling this
/// more than once is harmless; later calls report the logger that is already set.
pub fn init_logger() -> Result<(), log::SetLoggerError> {
    let env = env_logger::Env::default()
        .write_style_or("RUST_LOG_STYLE", "always")
        .filter_or("RUST_LOG", "trace");

    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            let mut style = buf.style();

            match record.level() {
                log::Level::Info => style.set_color(env_logger::fmt::Color::Green),
                log::Level::Warn => style.set_color(env_logger::fmt::Color::Yellow),
                log::Level::Error => style.set_color(env_logger::fmt::Color::Red),
                _ => style.set_color(env_logger::fmt::Color::White),
            };

            let timestamp = buf.timestamp();

            writeln!(
                buf,
                "{:<20} : {:<5} : {:<8} : {}",
                timestamp,
                style.value(record.level()),
                record.target(),
                record.args()
            )
        })
        .try_init()
}
