pub fn setup(
    is_debug: bool,
    level: log::LevelFilter,
) -> Result<(), data::log::Error> {
    let level = if is_debug {
        log::LevelFilter::Trace
    } else {
        level
    };

    let mut logger = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}:{} -- {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                message
            ));
        })
        .level(log::LevelFilter::Off)
        .level_for("panic", log::LevelFilter::Error)
        .level_for("data", level)
        .level_for("hark", level);

    if is_debug {
        logger = logger.chain(std::io::stderr());
    } else {
        logger = logger.chain(data::log::file()?);
    }

    logger.apply()?;

    Ok(())
}
