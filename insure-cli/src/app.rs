use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use insure_core::calculations::{PremiumCalculator, PremiumError, PremiumInput, PremiumQuote};
use insure_core::forms::format::{format_amount, format_rupees, parse_optional_amount};
use insure_core::{
    AddOn, DocumentGateway, DocumentKind, DocumentScore, DocumentUpload, NoClaimBonus,
};
use insure_http::HttpGateway;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::Settings;
use crate::terminal;

// ─── argument parsers ────────────────────────────────────────────────────────

pub fn parse_idv(s: &str) -> Result<Decimal, String> {
    match parse_optional_amount(s) {
        Ok(Some(idv)) if idv >= Decimal::ZERO => Ok(idv),
        Ok(Some(_)) => Err("IDV cannot be negative".to_string()),
        Ok(None) => Err("IDV is required".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

pub fn parse_ncb(s: &str) -> Result<NoClaimBonus, String> {
    NoClaimBonus::parse(s).ok_or_else(|| {
        let valid: Vec<String> = NoClaimBonus::all().iter().map(|n| n.percent().to_string()).collect();
        format!("expected one of {}", valid.join(", "))
    })
}

pub fn parse_addon(s: &str) -> Result<AddOn, String> {
    AddOn::parse(s.trim()).ok_or_else(|| {
        let valid: Vec<&str> = AddOn::all().iter().map(AddOn::label).collect();
        format!("expected one of: {}", valid.join(", "))
    })
}

pub fn parse_kind(s: &str) -> Result<DocumentKind, String> {
    DocumentKind::parse(s).ok_or_else(|| "expected 'policy' or 'claim'".to_string())
}

// ─── reports ─────────────────────────────────────────────────────────────────

/// Plain-text premium breakdown and coverage for `input`.
pub fn quote_report(input: &PremiumInput) -> Result<String, PremiumError> {
    let quote = PremiumCalculator::standard().calculate(input)?;
    Ok(render_quote(input, &quote))
}

fn render_quote(
    input: &PremiumInput,
    quote: &PremiumQuote,
) -> String {
    let addons = if input.addons.is_empty() {
        "None".to_string()
    } else {
        input.addons.iter().map(AddOn::label).collect::<Vec<_>>().join(", ")
    };
    let c = &quote.coverage;

    let mut out = String::new();
    let _ = writeln!(out, "IDV:                    {}", format_rupees(input.idv));
    let _ = writeln!(out, "No claim bonus:         {}", input.ncb);
    let _ = writeln!(out, "Add-ons:                {addons}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Basic premium:          {}", format_amount(quote.basic_premium));
    let _ = writeln!(out, "Add-on premium:         {}", format_amount(quote.addon_premium));
    let _ = writeln!(out, "GST (18%):              {}", format_amount(quote.tax));
    let _ = writeln!(out, "Total premium:          {}", format_rupees(quote.total));
    let _ = writeln!(out);
    let _ = writeln!(out, "Umbrella limit:         {}", format_rupees(c.umbrella_limit));
    let _ = writeln!(out, "Policy CSL:             {}", format_rupees(c.policy_csl));
    let _ = write!(out, "Total insurance amount: {}", format_rupees(c.total_insurance_amount));
    out
}

fn render_score(score: &DocumentScore) -> String {
    format!(
        "{}: {} ({:.1}% confidence)",
        score.file_name,
        score.predicted_label,
        score.confidence * 100.0
    )
}

// ─── commands ────────────────────────────────────────────────────────────────

fn read_upload(path: &Path) -> Result<DocumentUpload> {
    let bytes = fs::read(path).with_context(|| format!("cannot read '{}'", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(DocumentUpload::new(file_name, bytes))
}

/// Reads the reviewed fields for `update`. Only a JSON object is accepted,
/// matching the shape `extract` prints.
fn read_fields(path: &Path) -> Result<serde_json::Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("cannot read '{}'", path.display()))?;
    let fields: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("'{}' is not valid JSON", path.display()))?;
    if !fields.is_object() {
        anyhow::bail!("'{}' must contain a JSON object of fields", path.display());
    }
    Ok(fields)
}

fn gateway(settings: &Settings) -> Result<HttpGateway> {
    debug!(base_url = %settings.api.base_url, "creating HTTP gateway");
    HttpGateway::new(&settings.api).context("cannot create HTTP client")
}

pub async fn run_apply(settings: &Settings) -> Result<()> {
    let gateway = gateway(settings)?;
    let session = settings.session();
    if !session.is_authenticated() {
        anyhow::bail!(
            "no session token configured; set [session] token in the config file or {}",
            crate::config::API_TOKEN_VAR
        );
    }

    match terminal::run_wizard(&gateway, &session).await? {
        Some(done) => info!(application_id = %done.receipt.application_id, "wizard finished"),
        None => info!("wizard abandoned"),
    }
    Ok(())
}

pub fn run_quote(input: &PremiumInput) -> Result<()> {
    let report = quote_report(input).context("cannot price policy")?;
    println!("{report}");
    Ok(())
}

pub async fn run_score(
    settings: &Settings,
    path: &Path,
) -> Result<()> {
    let upload = read_upload(path)?;
    let score = gateway(settings)?
        .score_document(&settings.session(), &upload)
        .await
        .context("document scoring failed")?;
    println!("{}", render_score(&score));
    Ok(())
}

pub async fn run_extract(
    settings: &Settings,
    kind: DocumentKind,
    path: &Path,
) -> Result<()> {
    let upload = read_upload(path)?;
    let fields = gateway(settings)?
        .extract_document(kind, &upload)
        .await
        .context("document extraction failed")?;
    println!("{}", serde_json::to_string_pretty(&fields)?);
    Ok(())
}

pub async fn run_update(
    settings: &Settings,
    kind: DocumentKind,
    path: &Path,
) -> Result<()> {
    let fields = read_fields(path)?;
    gateway(settings)?
        .update_document(kind, &fields)
        .await
        .context("document update failed")?;
    println!("Updated {} record", kind.as_str());
    Ok(())
}
