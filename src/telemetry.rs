use {
    std::io::IsTerminal,
    tracing_subscriber::filter::LevelFilter,
};

/// Initialize a global tracing subscriber: compact output on a terminal,
/// JSON otherwise, filtered by `RUST_LOG` with an INFO default.
pub fn setup_tracing() -> anyhow::Result<()> {
    let fmt_builder = tracing_subscriber::fmt()
        .with_file(false)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stderr().is_terminal());

    if std::io::stderr().is_terminal() {
        tracing::subscriber::set_global_default(fmt_builder.compact().finish())?;
    } else {
        tracing::subscriber::set_global_default(fmt_builder.json().finish())?;
    }
    Ok(())
}
