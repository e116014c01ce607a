use crate::app::AppContext;
use crate::config::{write_config, ImgcryptConfig};
use crate::errors::CliError;
use crate::ui::{badge, Badge};

pub fn handle_init(ctx: &AppContext<'_>, force: bool) -> anyhow::Result<()> {
    let path = ctx.config_path();
    if path.exists() && !force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}. Use --force to overwrite.",
            path.display()
        ))
        .into());
    }

    write_config(path, &ImgcryptConfig::default())?;
    tracing::info!(path = %path.display(), "config written");

    if !ctx.quiet() {
        let ui = ctx.ui_context(false);
        println!(
            "{}",
            badge(&ui, Badge::Ok, &format!("Wrote config to {}", path.display()))
        );
    }
    Ok(())
}

pub fn handle_show(ctx: &AppContext<'_>) -> anyhow::Result<()> {
    let path = ctx.config_path();
    let ui = ctx.ui_context(false);

    if !ctx.quiet() {
        let note = if path.exists() {
            format!("Config: {}", path.display())
        } else {
            format!("No config at {}; showing defaults", path.display())
        };
        eprintln!("{}", badge(&ui, Badge::Info, &note));
    }

    let contents =
        toml::to_string_pretty(ctx.config()).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    print!("{}", contents);
    Ok(())
}
