use crate::app::{load_payload, AppContext};
use crate::cli::InspectArgs;
use crate::ui::{badge, property_table, Badge};

pub fn handle_inspect(ctx: &AppContext<'_>, args: &InspectArgs) -> anyhow::Result<()> {
    let payload = load_payload(&args.input)?;
    let summary = payload.summary();
    let ui = ctx.ui_context(args.json);

    if ui.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let created = summary
        .created_at
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let rows = [
        ("File", args.input.display().to_string()),
        (
            "Version",
            summary.version.clone().unwrap_or_else(|| "unknown".to_string()),
        ),
        (
            "Mime type",
            summary.mime_type.clone().unwrap_or_else(|| "unknown".to_string()),
        ),
        ("Created", created),
        ("Image bytes", summary.plaintext_bytes.to_string()),
        ("Ciphertext bytes", summary.ciphertext_bytes.to_string()),
    ];
    println!("{}", property_table(&ui, &rows));

    if !summary.well_formed {
        if let Err(err) = payload.validate() {
            eprintln!("{}", badge(&ui, Badge::Warn, &err.user_message()));
        }
    }

    Ok(())
}
