use crate::app::{encryption_password, ensure_exists, AppContext, Session};
use crate::cli::EncryptArgs;
use crate::errors::CliError;
use crate::mime::mime_for_extension;
use crate::paths::encrypted_output_path;
use crate::ui::receipt;

pub async fn handle_encrypt(ctx: &AppContext<'_>, args: &EncryptArgs) -> anyhow::Result<()> {
    ensure_exists(&args.input, "Image")?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| encrypted_output_path(&args.input));
    super::ensure_writable(&output, args.force)?;

    let mime_type = match args.mime_type.as_deref() {
        Some(mime) if mime.trim().is_empty() => {
            return Err(CliError::invalid_input("--mime-type cannot be empty").into());
        }
        Some(mime) => Some(mime.trim().to_string()),
        None => args
            .input
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(mime_for_extension)
            .map(str::to_string),
    };

    let password = encryption_password(ctx.interactive())?;

    let ui = ctx.ui_context(false);
    let mut session = Session::start(ctx.config(), ui.clone())?;
    let payload = session
        .encrypt_file(&args.input, &password, mime_type)
        .await?;
    let input = session
        .current_file()
        .map(|path| path.display().to_string())
        .unwrap_or_default();
    session.close();

    payload.save(&output)?;
    tracing::info!(output = %output.display(), "payload written");

    if !ctx.quiet() {
        let output_display = output.display().to_string();
        let size = format!("{} bytes", payload.summary().plaintext_bytes);
        let mime = payload.mime_type().unwrap_or("unknown").to_string();
        println!(
            "{}",
            receipt(
                &ui,
                "Encrypted",
                &[
                    ("Input", input.as_str()),
                    ("Output", output_display.as_str()),
                    ("Size", size.as_str()),
                    ("Mime type", mime.as_str()),
                ],
            )
        );
    }

    Ok(())
}
