use imgcrypt_core::fs::write_atomic;

use crate::app::{decryption_password, load_payload, AppContext, Session};
use crate::cli::DecryptArgs;
use crate::paths::decrypted_output_path;
use crate::ui::receipt;

pub async fn handle_decrypt(ctx: &AppContext<'_>, args: &DecryptArgs) -> anyhow::Result<()> {
    // Parse up front so a malformed file fails before the password prompt.
    let payload = load_payload(&args.input)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| decrypted_output_path(&args.input, payload.mime_type()));
    let mime = payload.mime_type().unwrap_or("unknown").to_string();
    super::ensure_writable(&output, args.force)?;

    let password = decryption_password(ctx.interactive())?;

    let ui = ctx.ui_context(false);
    let mut session = Session::start(ctx.config(), ui.clone())?;
    let image = session
        .decrypt_file(&args.input, payload, &password)
        .await?;
    session.close();

    write_atomic(&output, &image)?;
    tracing::info!(output = %output.display(), bytes = image.len(), "image written");

    if !ctx.quiet() {
        let output_display = output.display().to_string();
        let size = format!("{} bytes", image.len());
        println!(
            "{}",
            receipt(
                &ui,
                "Decrypted",
                &[
                    ("Output", output_display.as_str()),
                    ("Size", size.as_str()),
                    ("Mime type", mime.as_str()),
                ],
            )
        );
    }

    Ok(())
}
